//! Weekly fatigue accumulation and overreaching risk scores (0-100).

use serde::{Deserialize, Serialize};

/// Self-reported weekly recovery markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeeklyFatigueData {
    /// 0-3
    pub average_soreness: f64,
    /// 1-10, higher is better
    pub sleep_quality: f64,
    /// 1-10
    pub stress_level: f64,
    pub muscles_needing_recovery: u32,
    #[serde(rename = "consecutiveMRVWeeks")]
    pub consecutive_mrv_weeks: u32,
    pub performance_decline: bool,
}

impl Default for WeeklyFatigueData {
    fn default() -> Self {
        Self {
            average_soreness: 1.0,
            sleep_quality: 7.0,
            stress_level: 5.0,
            muscles_needing_recovery: 0,
            consecutive_mrv_weeks: 0,
            performance_decline: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatigueLevel {
    Low,
    Moderate,
    High,
    Excessive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeloadUrgency {
    None,
    Low,
    Medium,
    High,
}

/// Points contributed by each factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FatigueBreakdown {
    pub soreness: f64,
    pub sleep: f64,
    pub stress: f64,
    pub volume: f64,
    pub consecutive: f64,
    pub performance: f64,
}

impl FatigueBreakdown {
    pub fn total(&self) -> f64 {
        self.soreness + self.sleep + self.stress + self.volume + self.consecutive + self.performance
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FatigueAccumulation {
    pub fatigue_score: u32,
    pub fatigue_level: FatigueLevel,
    pub recommendations: Vec<String>,
    pub deload_urgency: DeloadUrgency,
    pub breakdown: FatigueBreakdown,
}

/// Score accumulated fatigue over a week.
///
/// Budget: soreness 30, sleep 20, stress 20, muscles needing recovery 20,
/// consecutive MRV weeks 10, performance decline 10. The total is capped at 100.
pub fn assess_fatigue_accumulation(data: &WeeklyFatigueData) -> FatigueAccumulation {
    let soreness = non_negative(data.average_soreness);
    let sleep = non_negative(data.sleep_quality).min(10.0);
    let stress = non_negative(data.stress_level).min(10.0);

    let breakdown = FatigueBreakdown {
        soreness: (soreness / 3.0 * 30.0).min(30.0),
        sleep: (20.0 - sleep / 10.0 * 20.0).max(0.0),
        stress: stress / 10.0 * 20.0,
        volume: (f64::from(data.muscles_needing_recovery) / 12.0 * 20.0).min(20.0),
        consecutive: (f64::from(data.consecutive_mrv_weeks) * 5.0).min(10.0),
        performance: if data.performance_decline { 10.0 } else { 0.0 },
    };

    let score = breakdown.total().min(100.0);

    let (level, urgency, recommendations) = if score <= 25.0 {
        (
            FatigueLevel::Low,
            DeloadUrgency::None,
            vec![
                "Continue current program",
                "Consider volume progression opportunities",
            ],
        )
    } else if score <= 50.0 {
        (
            FatigueLevel::Moderate,
            DeloadUrgency::Low,
            vec![
                "Monitor recovery closely",
                "Ensure adequate sleep and nutrition",
            ],
        )
    } else if score <= 75.0 {
        (
            FatigueLevel::High,
            DeloadUrgency::Medium,
            vec![
                "Reduce training stress",
                "Consider recovery week",
                "Prioritize sleep and stress management",
            ],
        )
    } else {
        (
            FatigueLevel::Excessive,
            DeloadUrgency::High,
            vec![
                "Implement deload immediately",
                "Address sleep and lifestyle factors",
                "Consider extending deload period",
            ],
        )
    };

    FatigueAccumulation {
        fatigue_score: score.round() as u32,
        fatigue_level: level,
        recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
        deload_urgency: urgency,
        breakdown,
    }
}

/// Multi-week trends used to judge overreaching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverreachingMetrics {
    pub weekly_performance_trend: Vec<f64>,
    pub weekly_fatigue_trend: Vec<f64>,
    pub volume_progression: Vec<f64>,
    /// 1-10
    pub motivation_level: u8,
    /// 1-10
    pub injury_risk: u8,
    /// Filled from the training state when unset
    #[serde(rename = "consecutiveMRVWeeks")]
    pub consecutive_mrv_weeks: Option<u32>,
}

impl Default for OverreachingMetrics {
    fn default() -> Self {
        Self {
            weekly_performance_trend: Vec::new(),
            weekly_fatigue_trend: Vec::new(),
            volume_progression: Vec::new(),
            motivation_level: 5,
            injury_risk: 1,
            consecutive_mrv_weeks: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverreachingRisk {
    pub risk_score: u32,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub requires_immediate_action: bool,
}

/// Score the risk of tipping from functional overreaching into overtraining.
pub fn assess_overreaching_risk(metrics: &OverreachingMetrics) -> OverreachingRisk {
    let mut score = 0u32;
    let mut factors = Vec::new();

    let performance = &metrics.weekly_performance_trend;
    if performance.len() >= 2 {
        let recent = &performance[performance.len().saturating_sub(3)..];
        if recent.windows(2).all(|w| w[1] <= w[0]) {
            score += 20;
            factors.push("Consistent performance decline");
        }
    }

    let fatigue = &metrics.weekly_fatigue_trend;
    if fatigue.len() >= 2 {
        let average = fatigue.iter().sum::<f64>() / fatigue.len() as f64;
        if average > 60.0 {
            score += 25;
            factors.push("High average fatigue");
        }
    }

    let volume = &metrics.volume_progression;
    if volume.len() >= 3 {
        let first = volume[0];
        let last = volume[volume.len() - 1];
        if (last - first) / volume.len() as f64 > 2.0 {
            score += 15;
            factors.push("Rapid volume progression");
        }
    }

    if metrics.motivation_level <= 3 {
        score += 15;
        factors.push("Low motivation/enjoyment");
    }

    if metrics.injury_risk >= 7 {
        score += 15;
        factors.push("High injury risk indicators");
    }

    if metrics.consecutive_mrv_weeks.unwrap_or(0) >= 2 {
        score += 10;
        factors.push("Consecutive weeks at MRV");
    }

    let score = score.min(100);
    let (level, recommendations) = match score {
        0..=20 => (
            RiskLevel::Low,
            vec![
                "Continue progressive overload",
                "Monitor for early warning signs",
            ],
        ),
        21..=40 => (
            RiskLevel::Moderate,
            vec![
                "Slow progression rate",
                "Increase recovery focus",
                "Consider planned deload",
            ],
        ),
        41..=70 => (
            RiskLevel::High,
            vec![
                "Implement deload week",
                "Address lifestyle stressors",
                "Reduce training frequency",
            ],
        ),
        _ => (
            RiskLevel::Critical,
            vec![
                "Stop training temporarily",
                "Focus on full recovery",
                "Consult with coach/healthcare provider",
            ],
        ),
    };

    OverreachingRisk {
        risk_score: score,
        risk_level: level,
        risk_factors: factors.into_iter().map(String::from).collect(),
        recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
        requires_immediate_action: score > 60,
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
