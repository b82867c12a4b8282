// 🧭 Session Controller - Create, Scan and Leaderboard over the store
//
// Every operation reloads the collection; nothing is cached between calls.

use crate::profile::{InputError, Profile, ProfileDraft};
use crate::ranking::{rank, RankedProfile, Tier};
use crate::scoring::ScoreWeights;
use crate::store::{Corruption, ProfileStore, StoreError};
use std::cell::RefCell;

pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

// ============================================================================
// ERRORS
// ============================================================================

/// Recoverable failures of a session operation; none of them ends the process
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("no profiles exist yet; create one first")]
    EmptyCollection,

    #[error("no profile found for {name}")]
    NotFound { name: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// MENU STATE MACHINE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    MainMenu,
    Creating,
    Scanning,
    Leaderboarding,
    Exit,
}

impl MenuState {
    /// Main menu entries in display order
    pub const CHOICES: [(MenuState, &'static str); 4] = [
        (MenuState::Scanning, "Scan a profile"),
        (MenuState::Creating, "Create a new profile"),
        (MenuState::Leaderboarding, "View the leaderboard"),
        (MenuState::Exit, "Quit"),
    ];

    /// Map a 1-based main menu choice to the state it leads to
    pub fn from_choice(input: &str) -> Option<MenuState> {
        let index: usize = input.trim().parse().ok()?;
        index
            .checked_sub(1)
            .and_then(|i| Self::CHOICES.get(i))
            .map(|(state, _)| *state)
    }

    /// State after an operation finishes. Exit is terminal.
    pub fn after_operation(self) -> MenuState {
        match self {
            MenuState::Exit => MenuState::Exit,
            _ => MenuState::MainMenu,
        }
    }
}

// ============================================================================
// RESULTS
// ============================================================================

#[derive(Debug, Clone)]
pub struct ScanResult {
    pub entry: RankedProfile,
    /// Size of the whole collection, for "rank/total"
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct LeaderboardEntry {
    pub entry: RankedProfile,
    pub tier: Option<Tier>,
}

#[derive(Debug, Clone)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    pub has_more: bool,
    pub total: usize,
}

// ============================================================================
// SESSION
// ============================================================================

pub struct Session {
    store: ProfileStore,
    weights: ScoreWeights,
    leaderboard_size: usize,
    corruption: RefCell<Option<Corruption>>,
}

impl Session {
    pub fn new(store: ProfileStore, weights: ScoreWeights, leaderboard_size: usize) -> Self {
        Session {
            store,
            weights,
            leaderboard_size: leaderboard_size.max(1),
            corruption: RefCell::new(None),
        }
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn leaderboard_size(&self) -> usize {
        self.leaderboard_size
    }

    /// The last corruption recovered by a load, if not yet reported
    pub fn take_corruption_notice(&self) -> Option<Corruption> {
        self.corruption.borrow_mut().take()
    }

    /// Validate the draft and append it. No duplicate check.
    pub fn create(&self, draft: &ProfileDraft) -> Result<Profile, SessionError> {
        let profile = draft.parse()?;

        let (total, corruption) = self.store.append(profile.clone())?;
        self.note(corruption);

        tracing::info!("Created profile {:?} ({} in store)", profile.name, total);
        Ok(profile)
    }

    /// Rank the collection and return the first case-insensitive match.
    ///
    /// Duplicate names resolve to the best ranked one; equal scores fall back
    /// to insertion order.
    pub fn scan(&self, name: &str) -> Result<ScanResult, SessionError> {
        let ranked = self.ranked()?;
        let total = ranked.len();

        let entry = ranked
            .into_iter()
            .find(|r| r.profile.name_matches(name))
            .ok_or_else(|| SessionError::NotFound {
                name: name.trim().to_string(),
            })?;

        tracing::debug!("Scan {:?}: rank {}/{}", name, entry.rank, total);
        Ok(ScanResult { entry, total })
    }

    /// Top entries of the ranked collection with their tier
    pub fn leaderboard(&self) -> Result<Leaderboard, SessionError> {
        let ranked = self.ranked()?;
        let total = ranked.len();

        let entries = ranked
            .into_iter()
            .take(self.leaderboard_size)
            .map(|entry| LeaderboardEntry {
                tier: Tier::for_rank(entry.rank),
                entry,
            })
            .collect();

        Ok(Leaderboard {
            entries,
            has_more: total > self.leaderboard_size,
            total,
        })
    }

    fn ranked(&self) -> Result<Vec<RankedProfile>, SessionError> {
        let report = self.store.load()?;
        self.note(report.corruption);

        if report.profiles.is_empty() {
            return Err(SessionError::EmptyCollection);
        }
        Ok(rank(report.profiles, &self.weights))
    }

    fn note(&self, corruption: Option<Corruption>) {
        if corruption.is_some() {
            *self.corruption.borrow_mut() = corruption;
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
