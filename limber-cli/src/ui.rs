use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use limber::config::SessionConfig;
use limber::landmarks::LandmarkSnapshot;
use limber::session::{ExerciseSession, SessionEvent, SessionRecorder, SessionSummary};
use log::info;
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Alignment, Constraint, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge, Paragraph},
};
use tokio::io::AsyncBufRead;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at, sleep};

use crate::frames::FrameStream;

const QUIT_HINT: &str = "Esc/q: quit";
const WELL_DONE_HOLD: Duration = Duration::from_secs(3);
const QUIT_POLL: Duration = Duration::from_millis(50);

fn draw(frame: &mut Frame, session: &ExerciseSession, status: &str, overlay: Option<&str>) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(3),
        Constraint::Length(3),
    ])
    .split(frame.area());

    // Header
    let title = match session.display_name() {
        Some(name) => format!(
            "Exercise: {} ({}/{})",
            name,
            session.current_index() + 1,
            session.total_exercises()
        ),
        None => "All exercises complete".to_string(),
    };
    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).title("Limber"));
    frame.render_widget(header, chunks[0]);

    // Count, or the countdown / completion message
    let body = match overlay {
        Some(text) => Paragraph::new(text)
            .style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center),
        None => Paragraph::new(format!("Count: {}", session.count()))
            .style(Style::default().fg(Color::White))
            .alignment(Alignment::Center),
    };
    frame.render_widget(body.block(Block::default().borders(Borders::ALL)), chunks[1]);

    let target = session.repetitions_per_exercise();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio((session.count() as f64 / target as f64).clamp(0.0, 1.0))
        .label(format!("{}/{}", session.count(), target));
    frame.render_widget(gauge, chunks[2]);

    // Footer with status
    let footer = Paragraph::new(status)
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(footer, chunks[3]);
}

fn is_quit(event: &Event) -> bool {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q'))
        }
        _ => false,
    }
}

/// Drains pending terminal events without blocking.
pub fn keyboard_quit() -> Result<bool> {
    while event::poll(Duration::ZERO)? {
        if is_quit(&event::read()?) {
            return Ok(true);
        }
    }
    Ok(false)
}

enum Input {
    Frame(Option<LandmarkSnapshot>),
    Ended,
    Quit,
}

fn quit_poll() -> Interval {
    let mut poll = interval_at(Instant::now() + QUIT_POLL, QUIT_POLL);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    poll
}

/// Waits for the next frame while still answering the quit keys, so a
/// stalled pose pipeline cannot lock the user in.
async fn next_input<R, Q>(frames: &mut FrameStream<R>, quit: &mut Q) -> Result<Input>
where
    R: AsyncBufRead + Unpin,
    Q: FnMut() -> Result<bool>,
{
    let next = frames.next_frame();
    tokio::pin!(next);
    let mut poll = quit_poll();

    loop {
        tokio::select! {
            biased;
            frame = &mut next => {
                return Ok(match frame? {
                    Some(snapshot) => Input::Frame(snapshot),
                    None => Input::Ended,
                });
            }
            _ = poll.tick() => {
                if quit()? {
                    return Ok(Input::Quit);
                }
            }
        }
    }
}

/// Sleeps for `hold`. Returns `true` if the user quit in the meantime.
async fn hold_or_quit<Q>(hold: Duration, quit: &mut Q) -> Result<bool>
where
    Q: FnMut() -> Result<bool>,
{
    let deadline = sleep(hold);
    tokio::pin!(deadline);
    let mut poll = quit_poll();

    loop {
        tokio::select! {
            biased;
            _ = &mut deadline => return Ok(false),
            _ = poll.tick() => {
                if quit()? {
                    return Ok(true);
                }
            }
        }
    }
}

async fn wait_for_quit<Q>(quit: &mut Q) -> Result<()>
where
    Q: FnMut() -> Result<bool>,
{
    let mut poll = quit_poll();
    loop {
        poll.tick().await;
        if quit()? {
            return Ok(());
        }
    }
}

async fn show_for<B, Q>(
    terminal: &mut Terminal<B>,
    session: &ExerciseSession,
    status: &str,
    text: &str,
    hold: Duration,
    quit: &mut Q,
) -> Result<bool>
where
    B: Backend,
    Q: FnMut() -> Result<bool>,
{
    terminal.draw(|frame| draw(frame, session, status, Some(text)))?;
    hold_or_quit(hold, quit).await
}

/// Shows 3, 2, 1, Start! before the next exercise. The pause is fixed:
/// frames are not read and quit keys wait until it is over.
async fn countdown<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &ExerciseSession,
    config: &SessionConfig,
) -> Result<()> {
    if config.countdown_secs == 0 {
        return Ok(());
    }
    let status = "Get ready...";
    let steps = (1..=config.countdown_secs)
        .rev()
        .map(|remaining| remaining.to_string())
        .chain(std::iter::once("Start!".to_string()));
    for text in steps {
        terminal.draw(|frame| draw(frame, session, status, Some(text.as_str())))?;
        sleep(Duration::from_secs(1)).await;
    }
    Ok(())
}

/// Feeds frames to the session at the configured rate until the session is
/// complete, the input ends and the user leaves, or the user quits.
///
/// `quit` is polled for the quit keys; the live dashboard passes
/// [`keyboard_quit`].
pub async fn run_dashboard<B, R, Q>(
    terminal: &mut Terminal<B>,
    mut frames: FrameStream<R>,
    mut recorder: SessionRecorder,
    config: &SessionConfig,
    mut quit: Q,
) -> Result<SessionSummary>
where
    B: Backend,
    R: AsyncBufRead + Unpin,
    Q: FnMut() -> Result<bool>,
{
    let mut ticker = interval(config.frame_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut status = QUIT_HINT.to_string();

    loop {
        terminal.draw(|frame| draw(frame, recorder.session(), &status, None))?;

        if quit()? {
            info!("Quit requested by user");
            break;
        }

        ticker.tick().await;
        let snapshot = match next_input(&mut frames, &mut quit).await? {
            Input::Frame(snapshot) => snapshot,
            Input::Quit => {
                info!("Quit requested while waiting for input");
                break;
            }
            Input::Ended => {
                status = format!("Input ended. {}", QUIT_HINT);
                terminal.draw(|frame| draw(frame, recorder.session(), &status, None))?;
                wait_for_quit(&mut quit).await?;
                break;
            }
        };

        match recorder.process(snapshot.as_ref()) {
            SessionEvent::NoChange => {
                if snapshot.is_none() {
                    status = format!("No pose detected | {}", QUIT_HINT);
                } else {
                    status = QUIT_HINT.to_string();
                }
            }
            SessionEvent::CountIncremented(count) => {
                status = format!("Repetition {} | {}", count, QUIT_HINT);
            }
            SessionEvent::ExerciseCompleted(_) => {
                countdown(terminal, recorder.session(), config).await?;
                status = QUIT_HINT.to_string();
                ticker.reset();
            }
            SessionEvent::SessionCompleted => {
                let quit_early = show_for(
                    terminal,
                    recorder.session(),
                    "Session complete",
                    "Well Done!",
                    WELL_DONE_HOLD,
                    &mut quit,
                )
                .await?;
                if quit_early {
                    info!("Quit requested during the completion message");
                }
                break;
            }
        }
    }

    Ok(recorder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use limber::exercise::ExerciseKind;
    use ratatui::backend::TestBackend;
    use tokio::io::{AsyncWriteExt, BufReader};

    const ARMS_UP: &str =
        r#"{"left_wrist": {"x": 0.3, "y": 0.2}, "right_wrist": {"x": 0.7, "y": 0.2}}"#;
    const ARMS_DOWN: &str =
        r#"{"left_wrist": {"x": 0.3, "y": 0.9}, "right_wrist": {"x": 0.7, "y": 0.9}}"#;
    const HEAD_LEFT: &str = r#"{"nose": {"x": 0.2, "y": 0.3}}"#;

    fn test_terminal() -> Terminal<TestBackend> {
        Terminal::new(TestBackend::new(60, 20)).unwrap()
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn one_rep_config(exercises: Vec<ExerciseKind>) -> SessionConfig {
        SessionConfig {
            repetitions_per_exercise: 1,
            exercises,
            ..SessionConfig::default()
        }
    }

    fn recorder_for(config: &SessionConfig) -> SessionRecorder {
        SessionRecorder::new(ExerciseSession::from_config(config).unwrap())
    }

    #[test]
    fn quit_keys() {
        for code in [KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')] {
            assert!(is_quit(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE))));
        }
        assert!(!is_quit(&Event::Key(KeyEvent::new(
            KeyCode::Char('x'),
            KeyModifiers::NONE
        ))));
        assert!(!is_quit(&Event::FocusLost));
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_holds_back_the_next_frame() {
        let config = one_rep_config(vec![ExerciseKind::ArmRaise, ExerciseKind::HeadTurn]);
        let countdown = Duration::from_secs(config.countdown_secs + 1);
        let mut terminal = test_terminal();

        let (mut tx, rx) = tokio::io::duplex(64);
        let frames = FrameStream::new(BufReader::new(rx));
        let start = Instant::now();

        let feed = async {
            tx.write_all(format!("{}\n{}\n", ARMS_UP, ARMS_DOWN).as_bytes())
                .await
                .unwrap();
            // Longer than the pipe: the write only finishes once the line is read.
            let turn = format!("{}{}\n", HEAD_LEFT, " ".repeat(1024));
            tx.write_all(turn.as_bytes()).await.unwrap();
            start.elapsed()
        };
        let dashboard = run_dashboard(
            &mut terminal,
            frames,
            recorder_for(&config),
            &config,
            || Ok(false),
        );

        let (turn_read_after, summary) = tokio::join!(feed, dashboard);
        let summary = summary.unwrap();

        assert!(turn_read_after >= countdown);
        assert!(start.elapsed() >= countdown + WELL_DONE_HOLD);
        assert!(summary.completed);
        assert_eq!(summary.total_repetitions(), 2);
        assert!(screen(&terminal).contains("Well Done!"));
    }

    #[tokio::test(start_paused = true)]
    async fn null_frame_shows_no_pose() {
        let config = SessionConfig::default();
        let mut terminal = test_terminal();
        let frames = FrameStream::new(&b"null\n"[..]);

        let mut polls = 0;
        let quit = move || -> Result<bool> {
            polls += 1;
            Ok(polls >= 2)
        };
        let summary = run_dashboard(&mut terminal, frames, recorder_for(&config), &config, quit)
            .await
            .unwrap();

        assert!(screen(&terminal).contains("No pose detected"));
        assert_eq!(summary.frames_processed, 1);
        assert_eq!(summary.frames_without_pose, 1);
        assert!(!summary.completed);
    }

    #[tokio::test(start_paused = true)]
    async fn quit_works_while_input_is_stalled() {
        let config = SessionConfig::default();
        let mut terminal = test_terminal();

        // Writer stays open but never sends a line.
        let (_tx, rx) = tokio::io::duplex(64);
        let frames = FrameStream::new(BufReader::new(rx));

        let mut polls = 0;
        let quit = move || -> Result<bool> {
            polls += 1;
            Ok(polls >= 3)
        };
        let dashboard = run_dashboard(&mut terminal, frames, recorder_for(&config), &config, quit);
        let summary = tokio::time::timeout(Duration::from_secs(5), dashboard)
            .await
            .expect("dashboard ignored quit while waiting for input")
            .unwrap();

        assert_eq!(summary.frames_processed, 0);
        assert!(!summary.completed);
    }
}
