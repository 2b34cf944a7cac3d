// generate_key.rs
// Utility to generate a new symmetric key for session tokens

#[allow(dead_code)]
#[path = "auth/token.rs"]
mod token;

use token::{generate_symmetric_key, TokenAuthority};

fn main() {
    println!("Generating new session token key...\n");

    let key = generate_symmetric_key();
    if let Err(e) = TokenAuthority::new(key.as_bytes()) {
        eprintln!("❌ Generated key was rejected: {}", e);
        std::process::exit(1);
    }

    println!("✅ Key generated successfully!\n");
    println!("Add this to your .env file:");
    println!("─────────────────────────────────────────────────");
    println!("TOKEN_SYMMETRIC_KEY={}", key);
    println!("─────────────────────────────────────────────────");
    println!("\n⚠️  IMPORTANT:");
    println!("  • Keep this key secure and never commit it to version control");
    println!("  • Changing the key logs every user out");
}
