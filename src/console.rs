// 🖥️ Console - the interactive menu loop
//
// Reads from any BufRead and writes to any Write so the whole flow runs in
// tests without a terminal. End of input behaves like choosing Quit.

use crate::insights::{format_score, group_thousands, Advice, Breakdown, Diagnosis, Medal, Progression};
use crate::profile::{parse_amount, AmountField, InputError, ProfileDraft};
use crate::ranking::Tier;
use crate::session::{Leaderboard, MenuState, ScanResult, Session, SessionError};
use anyhow::Result;
use std::io::{BufRead, Write};

const RULE_WIDTH: usize = 40;
const CHART_WIDTH: usize = 30;

pub struct Console<R, W> {
    session: Session,
    input: R,
    output: W,
    state: MenuState,
    chart_window: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(session: Session, input: R, output: W) -> Self {
        Self {
            session,
            input,
            output,
            state: MenuState::MainMenu,
            chart_window: false,
        }
    }

    /// Open the full-screen chart after each successful scan
    pub fn with_chart_window(mut self, enabled: bool) -> Self {
        self.chart_window = enabled;
        self
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the user quits or input ends
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(self.output, "WEALTHSCAN - FINANCIAL PORTAL")?;
        writeln!(self.output, "{}", "=".repeat(RULE_WIDTH))?;

        while self.state != MenuState::Exit {
            self.state = self.step()?;
        }

        writeln!(self.output, "\nClosing the system. To your future success!")?;
        self.output.flush()?;
        Ok(())
    }

    fn step(&mut self) -> Result<MenuState> {
        let next = match self.state {
            MenuState::MainMenu => return self.main_menu(),
            MenuState::Scanning => self.scan()?,
            MenuState::Creating => self.create()?,
            MenuState::Leaderboarding => self.leaderboard()?,
            MenuState::Exit => return Ok(MenuState::Exit),
        };
        // `None` means input ended mid-operation
        Ok(match next {
            Some(()) => self.state.after_operation(),
            None => MenuState::Exit,
        })
    }

    // ========================================================================
    // MAIN MENU
    // ========================================================================

    fn main_menu(&mut self) -> Result<MenuState> {
        writeln!(self.output, "\nMAIN MENU")?;
        for (i, (_, label)) in MenuState::CHOICES.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, label)?;
        }

        let Some(choice) = self.prompt("\nYour choice: ")? else {
            return Ok(MenuState::Exit);
        };

        match MenuState::from_choice(&choice) {
            Some(state) => Ok(state),
            None => {
                writeln!(
                    self.output,
                    "Invalid choice. Enter a number between 1 and {}.",
                    MenuState::CHOICES.len()
                )?;
                Ok(MenuState::MainMenu)
            }
        }
    }

    // ========================================================================
    // SCAN
    // ========================================================================

    fn scan(&mut self) -> Result<Option<()>> {
        let Some(name) = self.prompt("\nName to look up: ")? else {
            return Ok(None);
        };

        let outcome = self.session.scan(&name);
        self.report_corruption()?;

        match outcome {
            Ok(result) => {
                self.render_scan(&result)?;
                self.open_chart(&result)?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(Some(()))
    }

    fn render_scan(&mut self, result: &ScanResult) -> Result<()> {
        let entry = &result.entry;
        let profile = &entry.profile;
        let rule = "=".repeat(RULE_WIDTH);
        let out = &mut self.output;

        writeln!(out, "\n{}", rule)?;
        writeln!(out, "NAME:  {}", profile.name)?;
        writeln!(out, "RANK:  {}/{}", entry.rank, result.total)?;
        writeln!(out, "SCORE: {} points", format_score(entry.score))?;
        writeln!(out, "{}", rule)?;

        writeln!(out, "\nBREAKDOWN:")?;
        for field in [
            AmountField::Income,
            AmountField::Assets,
            AmountField::Investments,
            AmountField::Debts,
        ] {
            let label = format!("{}:", capitalize(field.name()));
            writeln!(
                out,
                "| {:<13} ${:>14}",
                label,
                group_thousands(profile.amount(field) as i128)
            )?;
        }
        writeln!(out, "└{}", "─".repeat(RULE_WIDTH - 2))?;

        if let Some(medal) = Medal::for_rank(entry.rank) {
            writeln!(out, "\n*** {} ***", medal.title())?;
        }

        let diagnosis = Diagnosis::for_rank(entry.rank);
        writeln!(out, "\nDIAGNOSIS:")?;
        writeln!(out, "| Status: {}", diagnosis.status())?;
        writeln!(out, "| Message: {}", diagnosis.message())?;

        writeln!(out, "\nWEALTH COMPOSITION:")?;
        for line in Breakdown::of(profile).render_text(CHART_WIDTH) {
            writeln!(out, "{}", line)?;
        }

        let progression = Progression::from_score(entry.score);
        writeln!(out, "\nFINANCIAL PROGRESSION:")?;
        writeln!(out, "{}", progression.bar())?;
        writeln!(out, "Phase: {}", progression.phase.description())?;

        writeln!(out, "\nSTRATEGIC ADVICE:")?;
        writeln!(out, "→ {}", Advice::for_profile(profile).text())?;
        Ok(())
    }

    #[cfg(feature = "tui")]
    fn open_chart(&mut self, result: &ScanResult) -> Result<()> {
        if self.chart_window {
            if let Err(e) = crate::ui::show_breakdown_chart(result) {
                tracing::warn!("Chart window failed: {e}");
                writeln!(self.output, "(chart window unavailable: {})", e)?;
            }
        }
        Ok(())
    }

    #[cfg(not(feature = "tui"))]
    fn open_chart(&mut self, _result: &ScanResult) -> Result<()> {
        if self.chart_window {
            tracing::debug!("Chart window requested but the tui feature is disabled");
        }
        Ok(())
    }

    // ========================================================================
    // CREATE
    // ========================================================================

    fn create(&mut self) -> Result<Option<()>> {
        writeln!(self.output, "\n{}", "=".repeat(RULE_WIDTH))?;
        writeln!(self.output, "NEW FINANCIAL PROFILE")?;
        writeln!(self.output, "{}", "=".repeat(RULE_WIDTH))?;

        let name = loop {
            let Some(name) = self.prompt("\nFull name: ")? else {
                return Ok(None);
            };
            if name.trim().is_empty() {
                writeln!(self.output, "Error: {}", InputError::EmptyName)?;
                continue;
            }
            break name;
        };

        let mut amounts = Vec::with_capacity(AmountField::ALL.len());
        for field in AmountField::ALL {
            let Some(raw) = self.prompt_amount(field)? else {
                return Ok(None);
            };
            amounts.push(raw);
        }

        let draft = ProfileDraft::new(&name, &amounts[0], &amounts[1], &amounts[2], &amounts[3]);
        let outcome = self.session.create(&draft);
        self.report_corruption()?;

        match outcome {
            Ok(profile) => writeln!(self.output, "\n✅ {} added successfully!", profile.name)?,
            Err(e) => self.report(&e)?,
        }
        Ok(Some(()))
    }

    /// Reprompt until the field parses; `None` on end of input
    fn prompt_amount(&mut self, field: AmountField) -> Result<Option<String>> {
        loop {
            let Some(raw) = self.prompt(field.prompt())? else {
                return Ok(None);
            };
            match parse_amount(field, &raw) {
                Ok(_) => return Ok(Some(raw)),
                Err(e) => writeln!(self.output, "Error: {}", e)?,
            }
        }
    }

    // ========================================================================
    // LEADERBOARD
    // ========================================================================

    fn leaderboard(&mut self) -> Result<Option<()>> {
        let outcome = self.session.leaderboard();
        self.report_corruption()?;

        match outcome {
            Ok(board) => {
                self.render_leaderboard(&board)?;
                if self.prompt("\nPress Enter to continue...")?.is_none() {
                    return Ok(None);
                }
            }
            Err(e) => self.report(&e)?,
        }
        Ok(Some(()))
    }

    fn render_leaderboard(&mut self, board: &Leaderboard) -> Result<()> {
        let out = &mut self.output;

        writeln!(out, "\n{}", "=".repeat(RULE_WIDTH))?;
        writeln!(out, "LEADERBOARD")?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(out, "\nTOP {}\n", board.entries.len())?;
        writeln!(out, "{:<5} {:<20} {:>15} {:<10}", "Rank", "Name", "Score", "Tier")?;
        writeln!(out, "{}", "-".repeat(55))?;

        for row in &board.entries {
            let tier = row
                .tier
                .map(|t: Tier| format!("{} {}", t.marker(), t.name()))
                .unwrap_or_default();
            writeln!(
                out,
                "{:<5} {:<20} {:>15} {:<10}",
                row.entry.rank,
                truncate(&row.entry.profile.name, 20),
                group_thousands(row.entry.score.round() as i128),
                tier
            )?;
        }

        if board.has_more {
            writeln!(
                out,
                "\n{} more profile(s) rank beyond the top {}",
                board.total - board.entries.len(),
                board.entries.len()
            )?;
        }
        Ok(())
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            tracing::debug!("End of input, leaving the menu loop");
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }

    fn report(&mut self, error: &SessionError) -> Result<()> {
        match error {
            SessionError::EmptyCollection => writeln!(
                self.output,
                "No profiles exist yet. Create a profile first."
            )?,
            SessionError::NotFound { name } => {
                writeln!(self.output, "\n🔍 No profile found for {}.", name)?
            }
            SessionError::InvalidInput(e) => writeln!(self.output, "Error: {}", e)?,
            SessionError::Store(e) => {
                tracing::error!("Profile store failure: {e}");
                writeln!(self.output, "⚠️  Could not access the profile store: {}", e)?
            }
        }
        Ok(())
    }

    fn report_corruption(&mut self) -> Result<()> {
        if let Some(corruption) = self.session.take_corruption_notice() {
            writeln!(
                self.output,
                "⚠️  The profile store was corrupt ({}); starting from an empty collection.",
                corruption.reason
            )?;
            if let Some(backup) = corruption.backup {
                writeln!(self.output, "   The unreadable file was kept at {}", backup.display())?;
            }
        }
        Ok(())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;
    use crate::scoring::ScoreWeights;
    use crate::session::DEFAULT_LEADERBOARD_SIZE;
    use crate::store::ProfileStore;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn session() -> (Session, TempDir) {
        let dir = tempdir().expect("tempdir");
        let store = ProfileStore::new(dir.path().join("profiles.json"));
        (
            Session::new(store, ScoreWeights::default(), DEFAULT_LEADERBOARD_SIZE),
            dir,
        )
    }

    /// Run a scripted session and return everything written
    fn run_script(session: Session, script: &str) -> String {
        let mut console = Console::new(session, script.as_bytes(), Vec::new());
        console.run().expect("console run");
        assert_eq!(console.state(), MenuState::Exit);
        String::from_utf8(console.into_output()).expect("utf8 output")
    }

    #[test]
    fn test_create_then_scan() {
        let (session, dir) = session();
        let output = run_script(session, "2\nBob\nabc\n1000\n500\n200\n300\n1\nbob\n4\n");

        println!("{}", output);
        assert!(output.contains("income must be a whole number, got \"abc\""));
        assert!(output.contains("Bob added successfully"));
        assert!(output.contains("RANK:  1/1"));
        assert!(output.contains("SCORE: 1,030.0 points"));
        assert!(output.contains("GOLD TROPHY"));
        assert!(output.contains("Master of the economy"));
        assert!(output.contains("Closing the system"));

        let stored = ProfileStore::new(dir.path().join("profiles.json")).load().unwrap().profiles;
        assert_eq!(stored, vec![Profile::new("Bob", 1000, 500, 200, 300).unwrap()]);
    }

    #[test]
    fn test_negative_amount_is_reprompted() {
        let (session, dir) = session();
        let output = run_script(session, "2\nAnn\n-5\n5\n0\n0\n0\n4\n");

        assert!(output.contains("income must not be negative"));
        let stored = ProfileStore::new(dir.path().join("profiles.json")).load().unwrap().profiles;
        assert_eq!(stored[0].income, 5);
    }

    #[test]
    fn test_blank_name_is_reprompted() {
        let (session, _dir) = session();
        let output = run_script(session, "2\n   \nCat\n1\n1\n1\n1\n4\n");

        assert!(output.contains("name must not be empty"));
        assert!(output.contains("Cat added successfully"));
    }

    #[test]
    fn test_empty_store_messages() {
        let (session, _dir) = session();
        let output = run_script(session, "1\nalice\n3\n4\n");

        assert_eq!(output.matches("No profiles exist yet").count(), 2);
    }

    #[test]
    fn test_scan_not_found_returns_to_menu() {
        let (session, _dir) = session();
        session
            .store()
            .save(&[Profile::new("Alice", 1, 1, 1, 1).unwrap()])
            .unwrap();
        let output = run_script(session, "1\nzed\n4\n");

        assert!(output.contains("No profile found for zed"));
        assert_eq!(output.matches("MAIN MENU").count(), 2);
    }

    #[test]
    fn test_leaderboard_table() {
        let (session, _dir) = session();
        let profiles: Vec<Profile> = (0..12)
            .map(|i| Profile::new(&format!("Person {}", i), (i + 1) * 1000, 0, 0, 0).unwrap())
            .collect();
        session.store().save(&profiles).unwrap();

        let output = run_script(session, "3\n\n4\n");

        println!("{}", output);
        assert!(output.contains("TOP 10"));
        assert!(output.contains("[*] first"));
        assert!(output.contains("[+] podium"));
        assert!(output.contains("[.] notable"));
        assert!(output.contains("Person 11"));
        assert!(!output.contains("Person 1 "), "rank 11 is outside the top 10");
        assert!(output.contains("2 more profile(s) rank beyond the top 10"));
    }

    #[test]
    fn test_invalid_menu_choice() {
        let (session, _dir) = session();
        let output = run_script(session, "9\nabc\n4\n");

        assert_eq!(output.matches("Invalid choice").count(), 2);
    }

    #[test]
    fn test_end_of_input_exits() {
        let (session, _dir) = session();
        let output = run_script(session, "");

        assert!(output.contains("Closing the system"));
    }

    #[test]
    fn test_end_of_input_during_create_saves_nothing() {
        let (session, dir) = session();
        let output = run_script(session, "2\nBob\n1000\n");

        assert!(output.contains("Closing the system"));
        assert!(!dir.path().join("profiles.json").exists());
    }

    #[test]
    fn test_corrupt_store_is_reported() {
        let (session, dir) = session();
        fs::write(dir.path().join("profiles.json"), "{broken").unwrap();

        let output = run_script(session, "3\n4\n");

        assert!(output.contains("The profile store was corrupt"));
        assert!(output.contains("The unreadable file was kept at"));
        assert!(output.contains("No profiles exist yet"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 20), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
    }
}
