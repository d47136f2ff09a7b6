use std::io::BufRead;
use std::str::FromStr;
use std::sync::mpsc::Sender;

/// Discrete operator commands driving the kiosk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Capture,
    Reset,
    Quit,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown command {0:?} (expected start, capture, reset or quit)")]
pub struct UnknownCommand(String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" | "s" => Ok(Command::Start),
            "capture" | "c" => Ok(Command::Capture),
            "reset" | "r" => Ok(Command::Reset),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

/// Read commands line by line and forward them until EOF or the receiver
/// goes away. Blank lines are ignored.
pub fn forward_commands<R: BufRead>(input: R, tx: &Sender<Command>) {
    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(cmd) => {
                if tx.send(cmd).is_err() {
                    break;
                }
            }
            Err(e) => eprintln!("{e}"),
        }
    }
    tracing::debug!("command input closed");
}

/// Spawn a thread forwarding stdin commands into `tx`.
pub fn spawn_stdin_reader(tx: Sender<Command>) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("rollcall-stdin".into())
        .spawn(move || forward_commands(std::io::stdin().lock(), &tx))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_parse_commands() {
        assert_eq!("start".parse::<Command>().unwrap(), Command::Start);
        assert_eq!(" Capture \n".parse::<Command>().unwrap(), Command::Capture);
        assert_eq!("r".parse::<Command>().unwrap(), Command::Reset);
        assert_eq!("exit".parse::<Command>().unwrap(), Command::Quit);
        assert!("snap".parse::<Command>().is_err());
    }

    #[test]
    fn test_forward_skips_blank_and_unknown() {
        let (tx, rx) = mpsc::channel();
        forward_commands("start\n\nbogus\ncapture\n".as_bytes(), &tx);
        drop(tx);
        let got: Vec<Command> = rx.iter().collect();
        assert_eq!(got, vec![Command::Start, Command::Capture]);
    }
}
