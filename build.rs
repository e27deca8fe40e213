// build.rs

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

const FALLBACK_LANG: &str = "en";

fn main() {
    let lang = resolve_language();
    println!("cargo:rustc-env=CHAIN_BRIDGE_LANG_EFFECTIVE={}", lang);

    println!("cargo:rerun-if-env-changed=CHAIN_BRIDGE_LANG");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=locales/");

    // English is always loaded first so every key has a value.
    let mut messages = load_locale(FALLBACK_LANG)
        .unwrap_or_else(|| panic!("Missing fallback locale file: locales/{FALLBACK_LANG}.toml"));

    if lang != FALLBACK_LANG {
        match load_locale(&lang) {
            Some(overrides) => messages.extend(overrides),
            None => println!(
                "cargo:warning=Locale file 'locales/{}.toml' not found. Falling back to '{}'.",
                lang, FALLBACK_LANG
            ),
        }
    }

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let dest_path = Path::new(&out_dir).join("translations.rs");
    fs::write(&dest_path, render_macro(&messages)).expect("Failed to write translations.rs");
}

/// `lang_*` cargo features win over the `CHAIN_BRIDGE_LANG` variable.
fn resolve_language() -> String {
    let mut features: Vec<String> = env::vars()
        .filter_map(|(key, _)| {
            key.strip_prefix("CARGO_FEATURE_LANG_")
                .map(str::to_lowercase)
        })
        .collect();
    features.sort();

    match features.first() {
        Some(first) => {
            if features.len() > 1 {
                println!(
                    "cargo:warning=Multiple language features enabled ({:?}). Using '{}'.",
                    features, first
                );
            }
            first.clone()
        }
        None => env::var("CHAIN_BRIDGE_LANG").unwrap_or_else(|_| FALLBACK_LANG.to_string()),
    }
}

fn load_locale(lang: &str) -> Option<HashMap<String, String>> {
    let path = format!("locales/{lang}.toml");
    let content = fs::read_to_string(&path).ok()?;
    let table = toml::from_str(&content).unwrap_or_else(|e| panic!("Failed to parse {path}: {e}"));
    Some(table)
}

fn render_macro(messages: &HashMap<String, String>) -> String {
    let mut keys: Vec<&String> = messages.keys().collect();
    keys.sort();

    let mut code = String::from(
        "/// Looks up a message by key at compile time and expands to a string literal.\n#[macro_export]\nmacro_rules! t {\n",
    );
    for key in keys {
        let escaped = messages[key].replace('\\', "\\\\").replace('"', "\\\"");
        code.push_str(&format!("    (\"{}\") => {{ \"{}\" }};\n", key, escaped));
    }
    // Unknown keys fail the build instead of rendering an empty message.
    code.push_str(
        "    ($key:expr) => {{ compile_error!(concat!(\"Missing translation key: \", $key)) }};\n",
    );
    code.push_str("}\n");
    code
}
