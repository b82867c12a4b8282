// 📊 Breakdown chart window (tui feature)
// Full-screen bar chart of one scanned profile; any key closes it

use crate::insights::{format_score, group_thousands, Breakdown, BreakdownBar};
use crate::session::ScanResult;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;

/// Restores the terminal when dropped, including on early `?` returns
struct TerminalGuard {
    alternate_screen: bool,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut guard = TerminalGuard {
            alternate_screen: false,
        };
        execute!(io::stdout(), EnterAlternateScreen)?;
        guard.alternate_screen = true;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            tracing::warn!("Failed to disable raw mode: {e}");
        }
        if self.alternate_screen {
            if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen) {
                tracing::warn!("Failed to leave the alternate screen: {e}");
            }
        }
    }
}

pub fn show_breakdown_chart(result: &ScanResult) -> Result<()> {
    // Setup terminal; the guard undoes raw mode on every exit path
    let _guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let res = run_chart(&mut terminal, result);
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_chart<B: Backend>(terminal: &mut Terminal<B>, result: &ScanResult) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, result))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}

fn draw(f: &mut Frame, result: &ScanResult) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Name, rank, score
            Constraint::Min(0),    // Chart
            Constraint::Length(3), // Hint
        ])
        .split(f.size());

    render_header(f, chunks[0], result);
    render_chart(f, chunks[1], result);

    let hint = Paragraph::new(Line::from(vec![
        Span::styled(" any key", Style::default().fg(Color::Yellow)),
        Span::raw(" Close"),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(hint, chunks[2]);
}

fn render_header(f: &mut Frame, area: Rect, result: &ScanResult) {
    let entry = &result.entry;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            entry.profile.name.as_str(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Rank {}/{}", entry.rank, result.total),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Score {}", format_score(entry.score)),
            Style::default().fg(Color::Cyan),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_chart(f: &mut Frame, area: Rect, result: &ScanResult) {
    let breakdown = Breakdown::of(&result.entry.profile);
    let bars: Vec<Bar> = breakdown.bars.iter().map(to_bar).collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Wealth composition ($) "),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(13)
        .bar_gap(3);

    f.render_widget(chart, area);
}

fn to_bar(bar: &BreakdownBar) -> Bar<'static> {
    Bar::default()
        .label(Line::from(bar.label))
        .value(bar.amount)
        .text_value(group_thousands(bar.signed()))
        .style(Style::default().fg(bar_color(bar)))
        .value_style(Style::default().fg(Color::Black).bg(bar_color(bar)))
}

fn bar_color(bar: &BreakdownBar) -> Color {
    match bar.label {
        _ if bar.negative => Color::Red,
        "Income" => Color::Green,
        "Assets" => Color::Blue,
        "Investments" => Color::Magenta,
        _ => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;
    use crate::ranking::RankedProfile;
    use ratatui::backend::TestBackend;

    fn scan_result() -> ScanResult {
        ScanResult {
            entry: RankedProfile {
                profile: Profile::new("Bob", 1000, 500, 200, 300).unwrap(),
                score: 1030.0,
                rank: 1,
            },
            total: 1,
        }
    }

    #[test]
    fn test_chart_renders_header_and_labels() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let result = scan_result();

        terminal.draw(|f| draw(f, &result)).unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();

        assert!(screen.contains("Bob"));
        assert!(screen.contains("Rank 1/1"));
        assert!(screen.contains("Score 1,030.0"));
        assert!(screen.contains("Income"));
        assert!(screen.contains("Debts"));
    }

    #[test]
    fn test_guard_drop_without_alternate_screen() {
        // Entering can fail between raw mode and the alternate screen;
        // dropping the partial guard must still restore without panicking
        let guard = TerminalGuard {
            alternate_screen: false,
        };
        drop(guard);
    }

    #[test]
    fn test_debts_are_red() {
        let breakdown = Breakdown::of(&scan_result().entry.profile);
        let colors: Vec<Color> = breakdown.bars.iter().map(bar_color).collect();

        assert_eq!(
            colors,
            vec![Color::Green, Color::Blue, Color::Magenta, Color::Red]
        );
    }
}
