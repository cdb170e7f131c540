use shared::{PredictionLabel, ReportView, ResultRecord, SessionState};

/// Newest-first record of every image classified in this session.
#[derive(Debug, Default, Clone)]
pub struct ResultsLedger {
    records: Vec<ResultRecord>,
}

impl ResultsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends a record. Identifiers need not be unique.
    pub fn record(&mut self, image: impl Into<String>, label: PredictionLabel) -> &ResultRecord {
        self.records.insert(0, ResultRecord::new(image, label));
        &self.records[0]
    }

    pub fn snapshot(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// State owned by one interactive session.
#[derive(Debug, Default)]
pub struct SessionContext {
    ledger: ResultsLedger,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, image: impl Into<String>, label: PredictionLabel) -> &ResultRecord {
        self.ledger.record(image, label)
    }

    pub fn snapshot(&self) -> &[ResultRecord] {
        self.ledger.snapshot()
    }

    pub fn state(&self) -> SessionState {
        SessionState::of(self.ledger.snapshot())
    }

    pub fn report(&self) -> ReportView {
        ReportView::from_records(self.ledger.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PredictionLabel::{Glaucoma, Normal};

    #[test]
    fn newest_record_comes_first() {
        let mut ledger = ResultsLedger::new();
        ledger.record("eye1.jpg", Glaucoma);
        ledger.record("eye2.jpg", Normal);

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot[0], ResultRecord::new("eye2.jpg", Normal));
        assert_eq!(snapshot[1], ResultRecord::new("eye1.jpg", Glaucoma));
    }

    #[test]
    fn duplicate_identifiers_are_kept() {
        let mut ledger = ResultsLedger::new();
        ledger.record("eye1.jpg", Glaucoma);
        ledger.record("eye1.jpg", Glaucoma);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn record_returns_the_new_head() {
        let mut ledger = ResultsLedger::new();
        ledger.record("a.png", Normal);
        let head = ledger.record("b.png", Glaucoma).clone();
        assert_eq!(head, ledger.snapshot()[0]);
    }

    #[test]
    fn session_moves_from_idle_to_has_results_and_stays() {
        let mut session = SessionContext::new();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.report().records.is_empty());

        session.record("eye1.jpg", Glaucoma);
        assert_eq!(session.state(), SessionState::HasResults);

        session.record("eye2.jpg", Normal);
        assert_eq!(session.state(), SessionState::HasResults);
        assert_eq!(session.report().total(), 2);
    }

    #[test]
    fn sessions_are_independent() {
        let mut first = SessionContext::new();
        let second = SessionContext::new();
        first.record("eye1.jpg", Glaucoma);
        assert_eq!(first.snapshot().len(), 1);
        assert!(second.snapshot().is_empty());
    }
}
