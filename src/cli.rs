use argh::FromArgs;
use std::time::Duration;

/// Validated input of the echo session: where to ping and how long to wait.
pub struct CommandParameters {
    pub host: String,
    pub timeout: Duration,
}

/// Malformed or missing command line arguments; the caller prints the usage
/// text and exits cleanly.
#[derive(Debug)]
pub struct InvalidInput {
    pub message: String,
}

impl std::fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "InvalidInput")?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for InvalidInput {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

#[derive(FromArgs)]
/// pico_ping - send ICMP echo requests to a destination continuously
struct PingArgs {
    #[argh(option, short = 'W', default = "5")]
    /// response packet timeout [sec]
    timeout: u64,

    #[argh(positional)]
    /// destination host name or IPv4 address
    host: String,
}

pub fn get_input(args: &[&str]) -> Result<CommandParameters, InvalidInput> {
    match PingArgs::from_args(&["pico_ping"], args) {
        Ok(parsed) => Ok(CommandParameters {
            host: parsed.host,
            timeout: Duration::from_secs(parsed.timeout),
        }),
        Err(early_exit) => Err(InvalidInput {
            message: early_exit.output,
        }),
    }
}

pub fn show_usage() {
    println!();
    println!("Usage:");
    println!("  pico_ping [OPTION...] destination");
    println!("  -W, --timeout arg  Response packet timeout [sec] (default: 5)");
}
