/// Policy deciding whether full event extraction is worth the playback cost.
///
/// Passed explicitly into the orchestrator so tests can vary it without
/// touching shared state.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionPolicy {
    pub enabled: bool,
    pub allowed_ladders: Vec<i32>,
    pub supported_datasets: Vec<i32>,
    pub minimum_rating: f64,
    pub interval_ms: u32,
}

impl Default for ExtractionPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_ladders: vec![131, 132],
            supported_datasets: vec![1],
            minimum_rating: 0.0,
            interval_ms: 30_000,
        }
    }
}

impl ExtractionPolicy {
    pub fn should_extract(
        &self,
        players: &[common::SummaryPlayer],
        ladder_id: Option<i32>,
        dataset_id: i32,
        can_playback: bool,
    ) -> bool {
        if players.is_empty() {
            return false;
        }

        // Unrated players count as 0 and still dilute the average.
        let rate_sum: f64 = players.iter().filter_map(|p| p.rate_snapshot).sum();
        let rate_avg = rate_sum / players.len() as f64;

        self.enabled
            && ladder_id
                .map(|l| self.allowed_ladders.contains(&l))
                .unwrap_or(false)
            && self.supported_datasets.contains(&dataset_id)
            && rate_avg >= self.minimum_rating
            && can_playback
    }
}
