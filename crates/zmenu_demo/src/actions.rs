//! Demo command catalog.

use anyhow::{bail, Context};
use zmenu::{confirm_two_way, read_line, CommandDescriptor, Console, Flow, Invocation, Role};

const RULE_WIDTH: usize = 60;

fn banner(console: &mut Console, title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    console.blank_line();
    console.line(&rule);
    console.line(format!("  {title}"));
    console.line(&rule);
}

pub fn hello() -> CommandDescriptor {
    CommandDescriptor::new("hello", "Hello World", |console, _| {
        console.blank_line();
        let text = console.colorize("Hello, World! 👋", Role::Primary);
        console.line(format!("  {text}"));
        Ok(Flow::Continue)
    })
    .icon("👋")
    .order(1)
    .description("Print a greeting")
}

pub fn greeting() -> CommandDescriptor {
    CommandDescriptor::new("greet", "Personal Greeting", |console, _| {
        console.blank_line();
        let name = read_line(console, "Enter your name: ")?;
        let name = if name.is_empty() { "stranger" } else { name.as_str() };
        console.line(format!("✓ Nice to meet you, {name}!"));
        Ok(Flow::Continue)
    })
    .icon("💬")
    .order(2)
    .description("Ask for a name and greet it")
}

/// Apply a binary operator. Division by zero is an error.
pub fn calculate(lhs: f64, operator: &str, rhs: f64) -> anyhow::Result<f64> {
    let value = match operator {
        "+" => lhs + rhs,
        "-" => lhs - rhs,
        "*" | "x" => lhs * rhs,
        "/" if rhs == 0.0 => bail!("division by zero"),
        "/" => lhs / rhs,
        other => bail!("unsupported operator '{other}'"),
    };
    Ok(value)
}

fn read_number(console: &mut Console, prompt: &str) -> anyhow::Result<f64> {
    let raw = read_line(console, prompt)?;
    raw.parse::<f64>()
        .with_context(|| format!("'{raw}' is not a number"))
}

pub fn calculator() -> CommandDescriptor {
    CommandDescriptor::new("calc", "Calculator", |console, _| {
        banner(console, "CALCULATOR");
        let lhs = read_number(console, "First number: ")?;
        let operator = read_line(console, "Operator (+ - * /): ")?;
        let rhs = read_number(console, "Second number: ")?;
        let result = calculate(lhs, &operator, rhs)?;
        console.line(format!("✓ {lhs} {operator} {rhs} = {result}"));
        Ok(Flow::Continue)
    })
    .icon("🧮")
    .group("Tools")
    .order(1)
    .description("Basic arithmetic on two numbers")
}

pub fn system_info() -> CommandDescriptor {
    CommandDescriptor::new("sysinfo", "System Info", |console, _| {
        banner(console, "SYSTEM INFORMATION");
        let cwd = std::env::current_dir().context("reading the working directory")?;
        let width = console.surface().width();
        console.line(format!("OS:        {}", std::env::consts::OS));
        console.line(format!("Arch:      {}", std::env::consts::ARCH));
        console.line(format!("PID:       {}", std::process::id()));
        console.line(format!("Directory: {}", cwd.display()));
        console.line(format!("Columns:   {width}"));
        Ok(Flow::Continue)
    })
    .icon("💻")
    .group("Tools")
    .order(2)
    .description("Platform and process details")
}

pub fn about() -> CommandDescriptor {
    CommandDescriptor::new("about", "About", |console, _| {
        banner(console, "ZMENU DEMO");
        console.line(format!("Version {}", env!("CARGO_PKG_VERSION")));
        console.blank_line();
        console.line("Features:");
        console.line("  • Menus built from flat command descriptors");
        console.line("  • Arrow keys, digit shortcuts and ESC to go back");
        console.line("  • Forms with validation, pre-fill and in-place redraw");
        Ok(Flow::Continue)
    })
    .icon("ℹ️")
    .order(90)
}

pub fn quit() -> CommandDescriptor {
    CommandDescriptor::new("quit", "Exit", |console, _| {
        console.blank_line();
        let leave = confirm_two_way(console, "Exit the application?", "YES", "NO")?;
        Ok(if leave { Flow::Exit } else { Flow::Continue })
    })
    .icon("🚪")
    .order(99)
}

/// One launchable script. Nothing is executed; the launcher shows what would
/// run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptEntry {
    pub key: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub path: &'static str,
    pub args: &'static str,
    pub description: &'static str,
}

pub const SCRIPTS: &[ScriptEntry] = &[
    ScriptEntry {
        key: "build-release",
        name: "Build Release",
        category: "build",
        path: "scripts/build.sh",
        args: "--release",
        description: "Optimised build of every workspace member",
    },
    ScriptEntry {
        key: "package",
        name: "Package Artifacts",
        category: "build",
        path: "scripts/package.sh",
        args: "",
        description: "Bundle binaries into release archives",
    },
    ScriptEntry {
        key: "unit-tests",
        name: "Run Unit Tests",
        category: "test",
        path: "scripts/test.sh",
        args: "--lib",
        description: "Fast in-crate tests",
    },
    ScriptEntry {
        key: "smoke",
        name: "Smoke Tests",
        category: "test",
        path: "scripts/smoke.sh",
        args: "--quick",
        description: "End-to-end checks against a local build",
    },
    ScriptEntry {
        key: "clean-cache",
        name: "Clean Caches",
        category: "maint",
        path: "scripts/clean.sh",
        args: "",
        description: "Remove build and download caches",
    },
];

fn run_script(console: &mut Console, entry: &ScriptEntry, invocation: &Invocation) {
    let path = invocation.params.first().map_or(entry.path, String::as_str);
    let args = invocation
        .options
        .get("args")
        .filter(|args| !args.is_empty())
        .map_or("none", String::as_str);
    console.blank_line();
    console.line(format!("▶️  Running: {}", entry.name));
    console.line(format!("📝 Path: {path}"));
    console.line(format!("📖 Description: {}", entry.description));
    console.line(format!("⚙️  Executing with args: {args}"));
    console.blank_line();
    let note = console.colorize("[dry run: script output would appear here]", Role::Secondary);
    console.line(note);
    tracing::info!(script = entry.key, path, args, "script launched (dry run)");
}

pub fn script_commands() -> Vec<CommandDescriptor> {
    SCRIPTS
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let entry = *entry;
            let invocation = Invocation::default()
                .param(entry.path)
                .option("args", entry.args);
            CommandDescriptor::new(entry.key, entry.name, move |console, invocation| {
                run_script(console, &entry, invocation);
                Ok(Flow::Continue)
            })
            .group(format!("Scripts.{}", entry.category))
            .order(index as i64)
            .description(entry.description)
            .invocation(invocation)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{calculate, script_commands, SCRIPTS};

    #[test]
    fn calculator_operators() {
        assert_eq!(calculate(6.0, "*", 7.0).expect("mul"), 42.0);
        assert_eq!(calculate(1.5, "+", 2.0).expect("add"), 3.5);
        assert_eq!(calculate(9.0, "/", 3.0).expect("div"), 3.0);
        assert!(calculate(1.0, "/", 0.0)
            .expect_err("zero")
            .to_string()
            .contains("division by zero"));
        assert!(calculate(1.0, "%", 2.0).is_err());
    }

    #[test]
    fn scripts_are_grouped_by_category() {
        let commands = script_commands();
        assert_eq!(commands.len(), SCRIPTS.len());
        assert_eq!(commands[0].group.as_deref(), Some("Scripts.build"));
        assert_eq!(commands[0].invocation.params, vec!["scripts/build.sh"]);
        assert_eq!(
            commands[2].invocation.options.get("args").map(String::as_str),
            Some("--lib")
        );
    }
}
