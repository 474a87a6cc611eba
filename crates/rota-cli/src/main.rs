mod cmd_intake;
mod cmd_launch;
mod cmd_queue;
mod cmd_rotation;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "rota", version, about = "Session rotation and work-queue orchestration")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read or mutate the persisted rotation state
    Rotation {
        #[command(subcommand)]
        cmd: RotationCmd,
    },
    /// Inspect and maintain the work queue
    Queue {
        #[command(subcommand)]
        cmd: QueueCmd,
    },
    /// Scan unstructured notes for queue seed suggestions
    Intake {
        /// File of free text to scan
        file: String,
        /// Record the matched suggestion as an idea
        #[arg(long)]
        apply: bool,
    },
    /// Launch the worker for this tick, degrading through tiers on failure
    Launch {
        /// Skip hooks, transforms, and context enrichment
        #[arg(long)]
        safe_mode: bool,
        /// Hardcoded session type and built-in prompt, no external scripts
        #[arg(long)]
        emergency: bool,
        /// Arguments passed through to the worker invocation (after --)
        #[arg(last = true)]
        worker_args: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum RotationCmd {
    /// Print the current rotation state
    Read {
        /// Print shell-assignable variables instead of JSON
        #[arg(long)]
        shell: bool,
    },
    /// Decide this tick's rotation slot and print the new state
    Advance {
        /// Print shell-assignable variables instead of JSON
        #[arg(long)]
        shell: bool,
    },
    /// Record the finished tick's result (consumed by the next advance)
    SetOutcome {
        /// success, timeout, or error
        outcome: String,
    },
    /// Bump the session counter without a rotation decision
    IncrementCounter,
}

#[derive(Subcommand, Debug)]
enum QueueCmd {
    /// Print the selected next task as JSON
    Next,
    /// List queue items
    List,
    /// Add a queue item
    Add {
        /// Item title
        title: String,
        /// Longer description
        #[arg(long, default_value = "")]
        desc: String,
        /// Higher runs earlier
        #[arg(long, default_value_t = 0)]
        priority: i32,
    },
    /// Add an idea to the staging list
    Idea {
        /// Idea title
        title: String,
        /// Short description
        #[arg(long, default_value = "")]
        desc: String,
    },
    /// Mark an item in progress
    Start {
        /// Item id (wq-*)
        id: String,
    },
    /// Mark an item done
    Done {
        /// Item id (wq-*)
        id: String,
    },
    /// Block an item, optionally with a command that detects the clear
    Block {
        /// Item id (wq-*)
        id: String,
        /// Command whose zero exit means the blocker has cleared
        #[arg(long)]
        check: Option<String>,
    },
    /// Retire an item without doing it
    Retire {
        /// Item id (wq-*)
        id: String,
    },
    /// Run the full housekeeping pass: dedup, unblock, promotions
    Housekeep,
    /// Move done and retired items to the long-term archive
    Archive,
}

fn main() -> anyhow::Result<()> {
    // Usage errors exit 1 (clap's default is 2); help and version stay 0.
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let code = if e.use_stderr() { 1 } else { 0 };
        let _ = e.print();
        std::process::exit(code);
    });
    let root = rota_store::state_root();
    rota_store::ensure_dirs(&root)?;

    match cli.cmd {
        Command::Rotation { cmd } => match cmd {
            RotationCmd::Read { shell } => cmd_rotation::read(&root, shell),
            RotationCmd::Advance { shell } => cmd_rotation::advance(&root, shell),
            RotationCmd::SetOutcome { outcome } => cmd_rotation::set_outcome(&root, &outcome),
            RotationCmd::IncrementCounter => cmd_rotation::increment_counter(&root),
        },
        Command::Queue { cmd } => match cmd {
            QueueCmd::Next => cmd_queue::next(&root),
            QueueCmd::List => cmd_queue::list(&root),
            QueueCmd::Add {
                title,
                desc,
                priority,
            } => cmd_queue::add(&root, &title, &desc, priority),
            QueueCmd::Idea { title, desc } => cmd_queue::idea(&root, &title, &desc),
            QueueCmd::Start { id } => cmd_queue::start(&root, &id),
            QueueCmd::Done { id } => cmd_queue::done(&root, &id),
            QueueCmd::Block { id, check } => cmd_queue::block(&root, &id, check),
            QueueCmd::Retire { id } => cmd_queue::retire(&root, &id),
            QueueCmd::Housekeep => {
                tokio::runtime::Runtime::new()?.block_on(cmd_queue::housekeep(&root))
            }
            QueueCmd::Archive => cmd_queue::archive(&root),
        },
        Command::Intake { file, apply } => cmd_intake::execute(&root, &file, apply),
        Command::Launch {
            safe_mode,
            emergency,
            worker_args,
        } => tokio::runtime::Runtime::new()?.block_on(cmd_launch::execute(
            &root,
            safe_mode,
            emergency,
            &worker_args,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn unknown_subcommand_is_a_usage_error() {
        let err = Cli::try_parse_from(["rota", "bogus"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn help_and_version_are_not_usage_errors() {
        let help = Cli::try_parse_from(["rota", "--help"]).unwrap_err();
        assert!(!help.use_stderr());
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);

        let version = Cli::try_parse_from(["rota", "--version"]).unwrap_err();
        assert!(!version.use_stderr());
    }
}
