//! Produce a bcrypt hash suitable for seeding an account row by hand.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, BufRead, Write};

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use voice_orders::domain::PASSWORD_MIN_LEN;
use voice_orders::domain::ports::PasswordHasher;
use voice_orders::outbound::security::{BcryptPasswordHasher, DEFAULT_BCRYPT_COST};
use zeroize::Zeroizing;

/// `hash-password` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "hash-password",
    about = "Hash a password with bcrypt; the password is read from stdin",
    version
)]
struct CliArgs {
    /// bcrypt work factor (4..=31).
    #[arg(long, default_value_t = DEFAULT_BCRYPT_COST)]
    cost: u32,
    /// Check the new hash against the input before printing it.
    #[arg(long)]
    verify: bool,
}

fn read_password(input: impl BufRead) -> Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    let mut input = input;
    input
        .read_line(&mut line)
        .wrap_err("read password from stdin")?;
    let password = Zeroizing::new(line.trim_end_matches(['\r', '\n']).to_owned());
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(eyre!(
            "password must be at least {PASSWORD_MIN_LEN} characters"
        ));
    }
    Ok(password)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let hasher = BcryptPasswordHasher::new(args.cost).wrap_err("configure bcrypt")?;
    let password = read_password(io::stdin().lock())?;
    let hash = hasher.hash(&password).wrap_err("hash password")?;
    if args.verify && !hasher.verify(&password, &hash).wrap_err("verify hash")? {
        return Err(eyre!("freshly generated hash failed verification"));
    }
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", hash.as_str())?;
    Ok(())
}
