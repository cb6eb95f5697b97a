use std::io::{self, BufRead, Write};

/// Blocks until the operator presses Enter. Stdin errors count as acknowledgement.
pub fn acknowledge(message: &str) {
    eprintln!("\n{message}");
    eprint!("Press Enter to close the browser...");
    let _ = io::stderr().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
