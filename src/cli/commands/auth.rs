use clap::{Arg, ArgAction, Command};

pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("token-secret")
                .long("token-secret")
                .help("Secret key signing link and session tokens")
                .env("SESAMO_TOKEN_SECRET")
                .required(true),
        )
        .arg(
            Arg::new("frontend-base-url")
                .long("frontend-base-url")
                .help("Frontend base URL used for callback links and CORS")
                .env("SESAMO_FRONTEND_BASE_URL")
                .default_value("http://localhost:5173"),
        )
        .arg(
            Arg::new("frontend-redirect-path")
                .long("frontend-redirect-path")
                .help("Frontend path to redirect to after a verified sign-in")
                .env("SESAMO_FRONTEND_REDIRECT_PATH")
                .default_value("/proposal"),
        )
        .arg(
            Arg::new("link-token-ttl-seconds")
                .long("link-token-ttl-seconds")
                .help("Sign-in link token TTL in seconds")
                .env("SESAMO_LINK_TOKEN_TTL_SECONDS")
                .default_value("600")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("session-ttl-seconds")
                .long("session-ttl-seconds")
                .help("Session cookie TTL in seconds")
                .env("SESAMO_SESSION_TTL_SECONDS")
                .default_value("604800")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("production")
                .long("production")
                .help("Mark the deployment as production; session cookies get the Secure attribute")
                .env("SESAMO_PRODUCTION")
                .action(ArgAction::SetTrue),
        )
}
