use anyhow::{Context, Result, bail};
use std::io::{self, BufRead, IsTerminal};
use zeroize::Zeroizing;

pub const KEY_ENV: &str = "CRYPTASTIC_KEY";

/// How the key text is turned into key bytes.
#[derive(Debug, Clone, Copy)]
pub enum KeyFormat {
    Raw,
    Hex,
}

pub fn read_key(format: KeyFormat) -> Result<Zeroizing<Vec<u8>>> {
    let text = read_key_text()?;
    match format {
        KeyFormat::Raw => Ok(Zeroizing::new(text.as_bytes().to_vec())),
        KeyFormat::Hex => hex::decode(text.trim())
            .map(Zeroizing::new)
            .context("key is not valid hex"),
    }
}

/// Key text from `CRYPTASTIC_KEY`, else from stdin.
///
/// Piped stdin carries the key on its first line and the payload after it:
/// `printf '%s\n%s' "$KEY" "hello" | cryptastic encrypt`. A terminal gets a
/// hidden prompt instead.
fn read_key_text() -> Result<Zeroizing<String>> {
    if let Some(key) = std::env::var(KEY_ENV).ok().filter(|k| !k.is_empty()) {
        return Ok(Zeroizing::new(key));
    }

    let stdin = io::stdin();
    let key = if stdin.is_terminal() {
        Zeroizing::new(rpassword::prompt_password("Key: ").context("failed to read key")?)
    } else {
        let mut line = Zeroizing::new(String::new());
        stdin
            .lock()
            .read_line(&mut line)
            .context("failed to read key from stdin")?;
        strip_line_ending(&mut line);
        line
    };

    if key.is_empty() {
        bail!("no key provided (set {KEY_ENV} or pass it on the first line of stdin)");
    }
    Ok(key)
}

fn strip_line_ending(line: &mut String) {
    let len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(len);
}
