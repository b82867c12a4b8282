// 🔎 Insights - derived classifications shown on a scanned profile
// Pure functions of rank, score and amounts; nothing here touches the store

use crate::profile::Profile;

// ============================================================================
// MEDALS & DIAGNOSIS (by rank)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: usize) -> Option<Medal> {
        match rank {
            1 => Some(Medal::Gold),
            2..=3 => Some(Medal::Silver),
            4..=5 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Medal::Gold => "GOLD TROPHY",
            Medal::Silver => "SILVER MEDAL",
            Medal::Bronze => "BRONZE STAR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnosis {
    MasterOfTheEconomy,
    FinancialVisionary,
    PromisingStrategist,
    AmbitiousClimber,
}

impl Diagnosis {
    pub fn for_rank(rank: usize) -> Diagnosis {
        match rank {
            0..=1 => Diagnosis::MasterOfTheEconomy,
            2..=3 => Diagnosis::FinancialVisionary,
            4..=10 => Diagnosis::PromisingStrategist,
            _ => Diagnosis::AmbitiousClimber,
        }
    }

    pub fn status(&self) -> &str {
        match self {
            Diagnosis::MasterOfTheEconomy => "Master of the economy",
            Diagnosis::FinancialVisionary => "Financial visionary",
            Diagnosis::PromisingStrategist => "Promising strategist",
            Diagnosis::AmbitiousClimber => "Ambitious climber",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Diagnosis::MasterOfTheEconomy => "Your empire inspires future generations",
            Diagnosis::FinancialVisionary => "Your rise is unstoppable",
            Diagnosis::PromisingStrategist => "Your discipline is paying off",
            Diagnosis::AmbitiousClimber => "Every master started as an apprentice",
        }
    }
}

// ============================================================================
// PROGRESSION (by score)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Beginner,
    Growth,
    Mastery,
}

impl Phase {
    pub fn description(&self) -> &str {
        match self {
            Phase::Beginner => "Beginner - focus on accumulation",
            Phase::Growth => "Growth - strategic investments",
            Phase::Mastery => "Mastery - capital preservation",
        }
    }
}

/// One point of progression per 1,000 score points, capped at 100
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progression {
    pub percent: u8,
    pub phase: Phase,
}

impl Progression {
    pub const BAR_WIDTH: usize = 50;

    pub fn from_score(score: f64) -> Progression {
        let percent = (score / 1000.0).trunc().clamp(0.0, 100.0) as u8;
        let phase = match percent {
            0..=29 => Phase::Beginner,
            30..=69 => Phase::Growth,
            _ => Phase::Mastery,
        };
        Progression { percent, phase }
    }

    /// `[▓▓▓░░░...] 12%`
    pub fn bar(&self) -> String {
        let filled = self.percent as usize / 2;
        format!(
            "[{}{}] {}%",
            "▓".repeat(filled),
            "░".repeat(Self::BAR_WIDTH - filled),
            self.percent
        )
    }
}

// ============================================================================
// ADVICE (by amounts)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advice {
    ReduceDebt,
    IncreaseInvestments,
    Diversify,
}

impl Advice {
    pub fn for_profile(profile: &Profile) -> Advice {
        if profile.debts > profile.income {
            Advice::ReduceDebt
        } else if (profile.investments as u128) * 2 < profile.assets as u128 {
            Advice::IncreaseInvestments
        } else {
            Advice::Diversify
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Advice::ReduceDebt => "Priority #1: reduce your debts (consolidate your loans)",
            Advice::IncreaseInvestments => "Opportunity: grow your productive investments",
            Advice::Diversify => "Strategy: diversify your asset portfolio",
        }
    }
}

// ============================================================================
// BREAKDOWN (chart data)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownBar {
    pub label: &'static str,
    pub amount: u64,
    /// Debts are drawn below the axis
    pub negative: bool,
}

impl BreakdownBar {
    pub fn signed(&self) -> i128 {
        if self.negative {
            -(self.amount as i128)
        } else {
            self.amount as i128
        }
    }
}

/// The four bars of a profile's wealth composition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakdown {
    pub bars: Vec<BreakdownBar>,
}

impl Breakdown {
    pub fn of(profile: &Profile) -> Breakdown {
        let bar = |label, amount, negative| BreakdownBar {
            label,
            amount,
            negative,
        };
        Breakdown {
            bars: vec![
                bar("Income", profile.income, false),
                bar("Assets", profile.assets, false),
                bar("Investments", profile.investments, false),
                bar("Debts", profile.debts, true),
            ],
        }
    }

    pub fn max_amount(&self) -> u64 {
        self.bars.iter().map(|b| b.amount).max().unwrap_or(0)
    }

    /// Horizontal text chart, bars scaled to `width` cells
    pub fn render_text(&self, width: usize) -> Vec<String> {
        let max = self.max_amount();
        let label_width = self.bars.iter().map(|b| b.label.len()).max().unwrap_or(0);

        self.bars
            .iter()
            .map(|b| {
                let cells = if max == 0 {
                    0
                } else {
                    ((b.amount as u128 * width as u128 + max as u128 / 2) / max as u128) as usize
                };
                let glyph = if b.negative { "-" } else { "█" };
                format!(
                    "{:<label_width$} | {:<width$} {}",
                    b.label,
                    glyph.repeat(cells),
                    group_thousands(b.signed()),
                    label_width = label_width,
                    width = width,
                )
            })
            .collect()
    }
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}

/// Score with grouped thousands and one decimal, e.g. `1,030.0`
pub fn format_score(score: f64) -> String {
    let tenths = (score * 10.0).round() as i128;
    let sign = if tenths < 0 { "-" } else { "" };
    let abs = tenths.abs();
    format!("{}{}.{}", sign, group_thousands(abs / 10), abs % 10)
}
