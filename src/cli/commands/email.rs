use clap::{Arg, Command};

pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("resend-api-key")
                .long("resend-api-key")
                .help("Resend API key; when unset, deliveries are logged instead of sent")
                .env("SESAMO_RESEND_API_KEY"),
        )
        .arg(
            Arg::new("email-from")
                .long("email-from")
                .help("From address for outbound magic link emails")
                .env("SESAMO_EMAIL_FROM")
                .default_value("onboarding@resend.dev"),
        )
        .arg(
            Arg::new("sandbox-recipient")
                .long("sandbox-recipient")
                .help("Redirect non-production deliveries to this address")
                .env("SESAMO_SANDBOX_RECIPIENT"),
        )
}
