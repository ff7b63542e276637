use observer_core::{JobId, JoinMode};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Join {
        user: String,
        session: String,
        mode: JoinMode,
    },
    /// Replace the live document. `\n` in the argument becomes a newline.
    Edit(String),
    Run,
    Select(JobId),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command {0:?}; try `help`")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

pub const HELP: &str = "\
join <user> <session> [new]   pick a user name and session
edit <text>                   replace the snippet (use \\n for newlines)
run                           execute the current snippet
select <job_id>               inspect a past job; again to return to editing
status                        show registries and job log
quit                          exit";

pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb {
        "join" => {
            let args: Vec<&str> = rest.split_whitespace().collect();
            match args.as_slice() {
                [user, session] => Command::Join {
                    user: user.to_string(),
                    session: session.to_string(),
                    mode: JoinMode::Existing,
                },
                [user, session, "new"] => Command::Join {
                    user: user.to_string(),
                    session: session.to_string(),
                    mode: JoinMode::New,
                },
                _ => return Err(CommandError::Usage("join <user> <session> [new]")),
            }
        }
        "edit" => Command::Edit(rest.replace("\\n", "\n")),
        "run" => Command::Run,
        "select" => match JobId::parse(rest) {
            Ok(job_id) => Command::Select(job_id),
            Err(_) => return Err(CommandError::Usage("select <job_id>")),
        },
        "status" => Command::Status,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}
