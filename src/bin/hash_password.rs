//! CLI tool to hash the admin password for `ADMIN_PASSWORD_HASH`.
//!
//! Usage:
//!   cargo run --bin hash-password -- --password 'correct horse'
//!   echo 'correct horse' | cargo run --bin hash-password
//!   cargo run --bin hash-password -- --cost 12 < password.txt

use std::env;
use std::io::{self, BufRead};

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut password: Option<String> = None;
    let mut cost = bcrypt::DEFAULT_COST;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--password" | "-p" => {
                i += 1;
                if i < args.len() {
                    password = Some(args[i].clone());
                }
            }
            "--cost" | "-c" => {
                i += 1;
                cost = match args.get(i).and_then(|c| c.parse::<u32>().ok()) {
                    Some(c) if (4..=31).contains(&c) => c,
                    _ => {
                        eprintln!("Error: --cost must be a number between 4 and 31");
                        std::process::exit(1);
                    }
                };
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    // Fall back to the first line of stdin
    let password = match password {
        Some(p) => p,
        None => {
            let mut line = String::new();
            if let Err(e) = io::stdin().lock().read_line(&mut line) {
                eprintln!("Error: failed to read password from stdin: {}", e);
                std::process::exit(1);
            }
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        eprintln!("Error: password must not be empty");
        print_usage();
        std::process::exit(1);
    }

    match bcrypt::hash(&password, cost) {
        Ok(hash) => {
            println!("{}", hash);
            eprintln!();
            eprintln!("Set it in the environment:");
            eprintln!("  ADMIN_PASSWORD_HASH='{}'", hash);
        }
        Err(e) => {
            eprintln!("Error: failed to hash password: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: hash-password [--password <PASSWORD>] [--cost <4-31>]");
    eprintln!();
    eprintln!("Prints a bcrypt hash for ADMIN_PASSWORD_HASH.");
    eprintln!("Without --password, the first line of stdin is used.");
}
