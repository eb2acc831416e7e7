use std::time::{Duration, Instant};

/// Per-process play statistics shown beside the playfield
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub longest_snake: usize,
    pub games_played: u32,
    /// Clock stops once the session is over
    running: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            longest_snake: 0,
            games_played: 0,
            running: true,
        }
    }

    pub fn update(&mut self) {
        if self.running {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.running = true;
    }

    pub fn on_game_over(&mut self, final_score: u32, final_length: usize) {
        self.update();
        self.running = false;
        self.games_played += 1;
        self.high_score = self.high_score.max(final_score);
        self.longest_snake = self.longest_snake.max(final_length);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_best_results_never_decrease() {
        let mut metrics = GameMetrics::new();

        metrics.on_game_over(10, 4);
        metrics.on_game_over(5, 9);
        assert_eq!(metrics.high_score, 10);
        assert_eq!(metrics.longest_snake, 9);
        assert_eq!(metrics.games_played, 2);

        metrics.on_game_over(15, 2);
        assert_eq!(metrics.high_score, 15);
        assert_eq!(metrics.longest_snake, 9);
    }

    #[test]
    fn test_clock_stops_after_game_over() {
        let mut metrics = GameMetrics::new();
        metrics.on_game_over(0, 1);
        let frozen = metrics.elapsed_time;

        std::thread::sleep(Duration::from_millis(20));
        metrics.update();
        assert_eq!(metrics.elapsed_time, frozen);

        metrics.on_game_start();
        std::thread::sleep(Duration::from_millis(20));
        metrics.update();
        assert!(metrics.elapsed_time >= Duration::from_millis(20));
    }
}
