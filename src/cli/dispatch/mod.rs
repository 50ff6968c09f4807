use crate::cli::actions::Action;
use anyhow::Result;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        host: matches
            .get_one("host")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --host"))?,
        port: matches.get_one::<u16>("port").copied().unwrap_or(1337),
    })
}
