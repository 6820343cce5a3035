use pico_ping::cli;
use pico_ping::{EchoSession, PingError, SocketType};

/// Every exit path returns status 0; failures are reported on standard
/// output only.
fn main() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::WARN)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let params = match cli::get_input(&args) {
        Ok(params) => params,
        Err(_) => {
            cli::show_usage();
            return;
        }
    };

    match EchoSession::new(&params.host, params.timeout, SocketType::DGRAM) {
        Ok(mut session) => session.start(),
        Err(PingError::InvalidAddress { .. }) => cli::show_usage(),
        Err(PingError::SocketInit { .. }) => {
            println!("Encountered runtime network error - check permissions");
        }
        Err(_) => println!("Encountered unknown error"),
    }
}
