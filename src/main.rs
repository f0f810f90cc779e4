// Console demo for the Rabin cipher
// Encrypts the message given on the command line (default "game") and
// prints the ciphertext together with every decryption candidate

use std::process;

use anyhow::{Context, Result};
use rabin_cipher::RabinCipher;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let message = std::env::args().nth(1).unwrap_or_else(|| "game".to_string());

    let mut rng = rand::thread_rng();
    let cipher = RabinCipher::new(None, &mut rng).context("key generation failed")?;

    let block = cipher.block_lengths();
    println!("public key n = {}", cipher.public_key());
    println!(
        "block widths: {} plaintext / {} ciphertext characters",
        block.plaintext(),
        block.ciphertext()
    );

    let ciphertext = cipher
        .encrypt(&message)
        .with_context(|| format!("cannot encrypt {message:?}"))?;
    println!("ciphertext: {ciphertext}");

    let candidates = cipher
        .decrypt(&ciphertext)
        .context("decryption failed")?;
    println!("decryption candidates (pick the intended one):");
    for candidate in candidates {
        println!("  {candidate}");
    }

    Ok(())
}
