mod support;

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use support::{console, ScriptedTerminal, DOWN, ENTER, UP};
use zmenu::menu::tree::build;
use zmenu::{
    confirm_two_way, Cancelled, CommandDescriptor, Console, Flow, GroupOrdering, InteractionError,
    MenuSession, SessionOutcome, Theme,
};

const ESC: &str = "\x1b";

type Calls = Rc<RefCell<Vec<String>>>;

fn recording(calls: &Calls, id: &str, flow: Flow) -> CommandDescriptor {
    let calls = Rc::clone(calls);
    let name = id.to_string();
    CommandDescriptor::new(id, id.to_uppercase(), move |_, _| {
        calls.borrow_mut().push(name.clone());
        Ok(flow)
    })
}

fn session(descriptors: Vec<CommandDescriptor>) -> MenuSession {
    let built = build("Main", descriptors, &GroupOrdering::default());
    assert!(built.errors.is_empty(), "{:?}", built.errors);
    MenuSession::new(built.tree)
}

fn run(session: &mut MenuSession, console: &mut Console) -> SessionOutcome {
    session.run(console).expect("session io")
}

#[test]
fn digits_and_escape_walk_nested_groups() {
    let calls = Calls::default();
    let mut session = session(vec![
        recording(&calls, "a", Flow::Continue).group("Tools"),
        recording(&calls, "b", Flow::Continue).group("Tools.Sub"),
        recording(&calls, "c", Flow::Continue),
    ]);
    let (mut console, term) = console(&["2", "1", "2", "1", ESC, ESC, ESC]);

    assert_eq!(run(&mut session, &mut console), SessionOutcome::CancelledByUser);
    assert_eq!(*calls.borrow(), vec!["a", "b"]);
    assert_eq!(term.remaining_input(), 0);
    assert!(!term.is_raw());
    assert_eq!(term.raw_entries(), term.restores());
}

#[test]
fn arrow_presses_wrap_modulo_child_count() {
    let calls = Calls::default();
    let mut session = session(vec![
        recording(&calls, "x", Flow::Exit),
        recording(&calls, "y", Flow::Exit),
        recording(&calls, "z", Flow::Exit),
    ]);
    let (mut console, _term) = console(&[DOWN, DOWN, DOWN, DOWN, ENTER]);

    assert_eq!(run(&mut session, &mut console), SessionOutcome::Completed);
    assert_eq!(*calls.borrow(), vec!["y"]);
}

#[test]
fn up_from_first_row_lands_on_last() {
    let calls = Calls::default();
    let mut session = session(vec![
        recording(&calls, "x", Flow::Exit),
        recording(&calls, "y", Flow::Exit),
    ]);
    let (mut console, _term) = console(&[UP, ENTER]);

    assert_eq!(run(&mut session, &mut console), SessionOutcome::Completed);
    assert_eq!(*calls.borrow(), vec!["y"]);
}

#[test]
fn digit_overrides_arrow_position() {
    let calls = Calls::default();
    let mut session = session(vec![
        recording(&calls, "x", Flow::Exit),
        recording(&calls, "y", Flow::Exit),
        recording(&calls, "z", Flow::Exit),
    ]);
    let (mut console, _term) = console(&[DOWN, DOWN, "1"]);

    assert_eq!(run(&mut session, &mut console), SessionOutcome::Completed);
    assert_eq!(*calls.borrow(), vec!["x"]);
}

#[test]
fn arrow_redraw_rewinds_list_and_footer_only() {
    let calls = Calls::default();
    let mut session = session(vec![
        recording(&calls, "x", Flow::Exit),
        recording(&calls, "y", Flow::Exit),
    ]);
    let (mut console, term) = console(&[DOWN, "2"]);

    assert_eq!(run(&mut session, &mut console), SessionOutcome::Completed);
    let output = term.output();
    assert!(output.contains("\r\x1b[3A\x1b[0J"));
    assert_eq!(output.matches("  MAIN\n").count(), 1);

    let screen = term.screen();
    assert!(screen.contains(&"  MAIN".to_string()));
    assert!(screen.contains(&"    1. X".to_string()));
    assert!(screen.contains(&"  ➤ 2. Y ◄".to_string()));
    assert_eq!(screen.iter().filter(|row| row.contains("1. X")).count(), 1);
    assert!(output.ends_with("\x1b[?25h"));
}

#[test]
fn back_row_returns_to_parent() {
    let calls = Calls::default();
    let mut session = session(vec![
        recording(&calls, "a", Flow::Continue).group("Tools"),
        recording(&calls, "b", Flow::Continue).group("Tools"),
    ]);
    let (mut console, term) = console(&["1", DOWN, DOWN, ENTER, ESC]);

    assert_eq!(run(&mut session, &mut console), SessionOutcome::CancelledByUser);
    assert!(calls.borrow().is_empty());
    assert!(term.output().contains("3. Back to Main"));
    assert_eq!(term.output().matches("  MAIN\n").count(), 2);
}

#[test]
fn exit_from_nested_handler_ends_only_that_level() {
    let calls = Calls::default();
    let mut session = session(vec![
        recording(&calls, "leave", Flow::Exit).group("Tools"),
        recording(&calls, "stay", Flow::Exit),
    ]);
    let (mut console, _term) = console(&["2", "1", "1"]);

    assert_eq!(run(&mut session, &mut console), SessionOutcome::Completed);
    assert_eq!(*calls.borrow(), vec!["leave", "stay"]);
}

#[test]
fn handler_errors_are_reported_and_the_session_continues() {
    let mut session = session(vec![CommandDescriptor::new("boom", "Boom", |_, _| {
        Err(anyhow::anyhow!("boom"))
    })]);
    let (mut console, term) = console(&["1", ESC]);

    assert_eq!(run(&mut session, &mut console), SessionOutcome::CancelledByUser);
    assert!(term.screen().iter().any(|row| row == "❌ Error executing action: boom"));
}

#[test]
fn user_cancelled_action_inside_handler_is_reported() {
    let mut session = session(vec![CommandDescriptor::new("form", "Form", |_, _| {
        Err(InteractionError::from(Cancelled::ByUser).into())
    })]);
    let (mut console, term) = console(&["1", ESC]);

    assert_eq!(run(&mut session, &mut console), SessionOutcome::CancelledByUser);
    assert!(term.screen().iter().any(|row| row == "  ⏹️  Action cancelled"));
}

#[test]
fn escape_in_a_confirmation_is_not_reported_as_a_form() {
    let mut session = session(vec![CommandDescriptor::new("quit", "Quit", |console, _| {
        let leave = confirm_two_way(console, "Exit the application?", "YES", "NO")?;
        Ok(if leave { Flow::Exit } else { Flow::Continue })
    })]);
    let (mut console, term) = console(&["1", ESC, ESC]);

    assert_eq!(run(&mut session, &mut console), SessionOutcome::CancelledByUser);
    let output = term.output();
    assert!(output.contains("Action cancelled"));
    assert!(!output.contains("Form cancelled"));
}

#[test]
fn signal_inside_handler_ends_the_session() {
    let mut session = session(vec![CommandDescriptor::new("slow", "Slow", |_, _| {
        Err(Cancelled::BySignal.into())
    })]);
    let (mut console, term) = console(&["1", ESC]);

    assert_eq!(run(&mut session, &mut console), SessionOutcome::CancelledBySignal);
    assert_eq!(term.remaining_input(), 1);
}

#[test]
fn delivered_signal_cancels_a_blocked_read() {
    let calls = Calls::default();
    let mut session = session(vec![recording(&calls, "x", Flow::Continue)]);
    let (mut console, term) = console(&[DOWN]);
    term.signal_when_drained();

    assert_eq!(run(&mut session, &mut console), SessionOutcome::CancelledBySignal);
    assert!(calls.borrow().is_empty());
    assert!(term.output().ends_with("\x1b[?25h"));
}

#[test]
fn closed_input_is_an_io_error() {
    let calls = Calls::default();
    let mut session = session(vec![recording(&calls, "x", Flow::Continue)]);
    let (mut console, _term) = console(&[]);

    let err = session.run(&mut console).expect_err("eof");
    assert!(matches!(err, InteractionError::Io { .. }));
}

#[test]
fn pause_waits_for_enter_after_an_action() {
    let calls = Calls::default();
    let mut session = session(vec![recording(&calls, "x", Flow::Continue)]);
    let term = ScriptedTerminal::new(&["1", "q", ENTER, ESC]);
    let mut console = Console::new(term.clone(), Theme::ansi());

    assert_eq!(run(&mut session, &mut console), SessionOutcome::CancelledByUser);
    assert_eq!(*calls.borrow(), vec!["x"]);
    assert!(term.output().contains("Press Enter to continue..."));
    assert_eq!(term.remaining_input(), 0);
}

#[test]
fn handlers_can_prompt_through_the_console() {
    let seen = Rc::new(RefCell::new(String::new()));
    let sink = Rc::clone(&seen);
    let mut session = session(vec![CommandDescriptor::new("greet", "Greet", move |console, _| {
        let name = zmenu::read_line(console, "Name: ")?;
        console.line(format!("Hello, {name}!"));
        *sink.borrow_mut() = name;
        Ok(Flow::Exit)
    })]);
    let (mut console, term) = console(&["1", "A", "d", "a", ENTER]);

    assert_eq!(run(&mut session, &mut console), SessionOutcome::Completed);
    assert_eq!(*seen.borrow(), "Ada");
    console.flush().expect("flush");
    assert!(term.screen().iter().any(|row| row == "Hello, Ada!"));
}
