use serde::{Serialize, Deserialize};
use chrono::{DateTime, Duration, Utc};
use crate::proficiency::{self, TIME_WEIGHT};

/// Inactivity window after which a profile is considered stale.
pub const DEFAULT_STALE_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    #[default]
    Easy,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// Numeric level on the shared 1-5 scale.
    pub fn level(&self) -> u8 {
        match self {
            Difficulty::Beginner => 1,
            Difficulty::Easy => 2,
            Difficulty::Intermediate => 3,
            Difficulty::Advanced => 4,
            Difficulty::Expert => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Easy => "easy",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(Difficulty::Beginner),
            "easy" => Some(Difficulty::Easy),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }
}

/// Map a difficulty name onto the 1-5 scale; unknown names count as 2.
pub fn difficulty_level(name: &str) -> u8 {
    Difficulty::parse(name).map(|d| d.level()).unwrap_or(2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl Pace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pace::Slow => "slow",
            Pace::Normal => "normal",
            Pace::Fast => "fast",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerProfile {
    pub learner_id: String,
    pub total_attempted: u32,
    pub total_completed: u32,
    pub average_completion_time_seconds: f64,
    pub failure_rate: f64,
    #[serde(default)]
    pub preferred_difficulty: Difficulty,
    #[serde(default)]
    pub learning_pace: Pace,
    #[serde(default)]
    pub last_activity_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LearnerProfile {
    /// Fresh profile with zeroed statistics.
    pub fn new<S: Into<String>>(learner_id: S) -> Self {
        let now = Utc::now();
        LearnerProfile {
            learner_id: learner_id.into(),
            total_attempted: 0,
            total_completed: 0,
            average_completion_time_seconds: 0.0,
            failure_rate: 0.0,
            preferred_difficulty: Difficulty::default(),
            learning_pace: Pace::default(),
            last_activity_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Completed share of attempts, as a percentage.
    pub fn completion_rate(&self) -> f64 {
        if self.total_attempted == 0 {
            return 0.0;
        }
        self.total_completed as f64 / self.total_attempted as f64 * 100.0
    }

    /// Fold one attempt into the aggregate statistics.
    ///
    /// Pace is judged against the average *after* this sample is folded in.
    pub fn record_interaction(
        &mut self,
        module_id: &str,
        completed: bool,
        time_taken_seconds: f64,
        score: Option<f64>,
    ) -> &Self {
        self.record_interaction_at(module_id, completed, time_taken_seconds, score, Utc::now())
    }

    pub fn record_interaction_at(
        &mut self,
        module_id: &str,
        completed: bool,
        time_taken_seconds: f64,
        score: Option<f64>,
        now: DateTime<Utc>,
    ) -> &Self {
        self.total_attempted += 1;
        if completed {
            self.total_completed += 1;
        }

        self.average_completion_time_seconds = proficiency::update_running_average(
            self.average_completion_time_seconds,
            time_taken_seconds,
            TIME_WEIGHT,
        );
        self.failure_rate = 1.0 - self.completion_rate() / 100.0;

        let average = self.average_completion_time_seconds;
        self.learning_pace = if time_taken_seconds < average * 0.8 {
            Pace::Fast
        } else if time_taken_seconds > average * 1.2 {
            Pace::Slow
        } else {
            Pace::Normal
        };

        self.last_activity_at = Some(now);
        self.updated_at = now;

        tracing::debug!(
            learner_id = %self.learner_id,
            module_id = %module_id,
            completed = completed,
            time_taken_seconds = time_taken_seconds,
            score = ?score,
            pace = self.learning_pace.as_str(),
            "Recorded learner interaction"
        );
        self
    }

    pub fn is_stale(&self, days: i64) -> bool {
        self.is_stale_at(days, Utc::now())
    }

    pub fn is_stale_at(&self, days: i64, now: DateTime<Utc>) -> bool {
        match self.last_activity_at {
            None => true,
            // A window too wide to represent reaches back past any activity
            Some(last) => match Duration::try_days(days).and_then(|d| now.checked_sub_signed(d)) {
                Some(cutoff) => last < cutoff,
                None => false,
            },
        }
    }

    /// Zero every statistic except the preferred difficulty.
    pub fn reset(&mut self) {
        let preferred = self.preferred_difficulty;
        *self = LearnerProfile::new(std::mem::take(&mut self.learner_id));
        self.preferred_difficulty = preferred;
    }
}
