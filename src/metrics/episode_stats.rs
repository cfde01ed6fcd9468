use std::collections::VecDeque;

/// Episode statistics with rolling averages
///
/// Tracks per-episode reward totals, lengths and scores over a rolling
/// window, plus session totals. The headless run mode prints these as
/// progress lines and a final summary.
///
/// # Example
///
/// ```rust
/// use snake_env::metrics::EpisodeStats;
///
/// let mut stats = EpisodeStats::new(100);
/// stats.record_episode(10, 150, 2);
///
/// assert_eq!(stats.total_episodes(), 1);
/// assert_eq!(stats.total_steps(), 150);
/// assert_eq!(stats.best_score(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct EpisodeStats {
    /// Summed rewards per episode (rolling window)
    episode_rewards: VecDeque<i32>,
    /// Episode lengths in steps (rolling window)
    episode_lengths: VecDeque<u32>,
    /// Final scores (rolling window)
    episode_scores: VecDeque<u32>,
    total_episodes: usize,
    total_steps: usize,
    best_score: u32,
    window_size: usize,
}

impl EpisodeStats {
    /// Create a tracker keeping the last `window_size` episodes for the
    /// rolling averages
    pub fn new(window_size: usize) -> Self {
        Self {
            episode_rewards: VecDeque::with_capacity(window_size),
            episode_lengths: VecDeque::with_capacity(window_size),
            episode_scores: VecDeque::with_capacity(window_size),
            total_episodes: 0,
            total_steps: 0,
            best_score: 0,
            window_size,
        }
    }

    /// Record a finished episode: total reward, length in steps, final score
    pub fn record_episode(&mut self, reward: i32, length: u32, score: u32) {
        Self::push(&mut self.episode_rewards, reward, self.window_size);
        Self::push(&mut self.episode_lengths, length, self.window_size);
        Self::push(&mut self.episode_scores, score, self.window_size);
        self.total_episodes += 1;
        self.total_steps += length as usize;
        if score > self.best_score {
            self.best_score = score;
        }
    }

    fn push<T>(window: &mut VecDeque<T>, value: T, cap: usize) {
        if window.len() == cap {
            window.pop_front();
        }
        window.push_back(value);
    }

    fn mean<T: Copy + Into<f64>>(window: &VecDeque<T>) -> f64 {
        if window.is_empty() {
            return 0.0;
        }
        let sum: f64 = window.iter().map(|&v| v.into()).sum();
        sum / window.len() as f64
    }

    /// Mean episode reward over the rolling window
    pub fn mean_reward(&self) -> f64 {
        Self::mean(&self.episode_rewards)
    }

    /// Mean episode length over the rolling window
    pub fn mean_length(&self) -> f64 {
        Self::mean(&self.episode_lengths)
    }

    /// Mean final score over the rolling window
    pub fn mean_score(&self) -> f64 {
        Self::mean(&self.episode_scores)
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Highest score seen this session (not windowed)
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Multi-line summary for the end of a run
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {}\nMean score (last {}): {:.2} | Best: {}\nMean reward: {:.1} | Mean length: {:.1}",
            self.total_episodes,
            self.total_steps,
            self.episode_scores.len(),
            self.mean_score(),
            self.best_score,
            self.mean_reward(),
            self.mean_length(),
        )
    }
}
