use std::process::ExitCode;

use anyhow::Context;
use zmenu::{build, logging, Console, EnvConfig, MenuSession, SessionOutcome};
use zmenu_demo::loaders::{load_form, load_ordering, load_theme, DemoPaths};
use zmenu_demo::{catalog, skipped_report, APP_TITLE};

fn main() -> ExitCode {
    match run() {
        Ok(SessionOutcome::Completed | SessionOutcome::CancelledByUser) => ExitCode::SUCCESS,
        Ok(SessionOutcome::CancelledBySignal) => ExitCode::from(130),
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "demo failed");
            eprintln!("zmenu-demo: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<SessionOutcome> {
    let config = EnvConfig::from_env();
    logging::init(&config, "zmenu-demo");
    let paths = DemoPaths::from_env();

    let theme = load_theme(paths.theme.as_deref())?;
    let ordering = load_ordering(paths.ordering.as_deref())?;
    let form = load_form(paths.form.as_deref())?;

    let built = build(APP_TITLE, catalog(form, &paths), &ordering);
    for err in &built.errors {
        tracing::warn!(error = %err, "command skipped");
    }
    for line in skipped_report(&built.errors) {
        eprintln!("zmenu-demo: {line}");
    }

    let mut console = Console::from_config(&config, theme).context("opening the terminal")?;
    let mut session = MenuSession::new(built.tree);
    let outcome = session.run(&mut console)?;

    let rule = "=".repeat(60);
    console.blank_line();
    console.line(&rule);
    match outcome {
        SessionOutcome::Completed => console.line("  Thank you for using the application!"),
        SessionOutcome::CancelledByUser | SessionOutcome::CancelledBySignal => {
            console.line("  ⏹️  Application stopped by user")
        }
    }
    console.line(&rule);
    console.flush()?;
    Ok(outcome)
}
