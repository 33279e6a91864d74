/*!
 * Shared helpers for integration tests
 */

#![allow(dead_code)]

use async_trait::async_trait;
use markdown_relay_translator::{
    PromptConfig, Result, RetryConfig, TranslationError, TranslationLibConfig,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Generator driven by a closure, counting every call
pub struct FnGenerator<F> {
    reply: F,
    calls: AtomicUsize,
}

impl<F> FnGenerator<F>
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    pub fn new(reply: F) -> Self {
        Self { reply, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<F> markdown_relay_translator::Generator for FnGenerator<F>
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.reply)(prompt)
    }
}

/// Fake translation: wraps every non-blank line and drops its indentation,
/// the way a model typically loses leading whitespace.
pub fn fake_translate(text: &str) -> String {
    let mut out = String::from("<think>\nreasoning\n</think>\n");
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str(&format!("{line} [zh]\n"));
        }
    }
    out
}

/// Generator that fails with a connection error for any prompt containing `marker`
pub fn failing_on(marker: &'static str) -> impl Fn(&str) -> Result<String> + Send + Sync {
    move |prompt: &str| {
        if prompt.contains(marker) {
            Err(TranslationError::Connection("connection refused".into()))
        } else {
            Ok(fake_translate(prompt))
        }
    }
}

/// Configuration with raw prompts and no backoff so tests stay fast
pub fn test_config() -> TranslationLibConfig {
    let mut config = TranslationLibConfig::default();
    config.retry = RetryConfig { max_attempts: 2, backoff_ms: 0 };
    config.prompts = PromptConfig { prose: "{text}".into(), navigation: "{text}".into() };
    config
}

pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

pub fn read(root: &Path, relative: &str) -> String {
    std::fs::read_to_string(root.join(relative)).unwrap()
}

/// Long prose document with `sections` level-2 headings, well above the single-unit threshold
pub fn long_prose(sections: usize) -> String {
    let mut doc = String::from("# Guide\n\nIntro paragraph.\n");
    for i in 0..sections {
        doc.push_str(&format!("\n## Section {i}\n\n{}\n", "Some body text. ".repeat(60)));
    }
    doc
}
