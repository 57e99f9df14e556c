//! Edge cases: markup translation through the full pipeline, timezone
//! handling, and malformed export data.

use serde_json::{Value, json};

use mattergram::config::ImportConfig;
use mattergram::convert::{Converter, Destination};
use mattergram::export::TelegramExport;
use mattergram::report::MemoryReporter;

fn config(raw: &str) -> ImportConfig {
    let config: ImportConfig = toml::from_str(raw).unwrap();
    config
}

fn default_config() -> ImportConfig {
    config(
        r#"
chat_type = "channel"
[users]
user123 = "abc"
user456 = "def"
[mentions]
"a.b.cexample" = "abc"
[import_into]
team = "example"
channel = "town square"
"#,
    )
}

fn convert(config: &ImportConfig, export: Value) -> (Vec<Value>, MemoryReporter) {
    let telegram: TelegramExport = serde_json::from_value(export).unwrap();
    let reporter = MemoryReporter::new();
    let envelopes = {
        let destination = Destination::for_export(&telegram, config).unwrap();
        let converter = Converter::new(config, destination, &reporter).unwrap();
        let conversion = converter.convert(&telegram.messages).unwrap();
        conversion
            .envelopes
            .iter()
            .map(|e| serde_json::to_value(e).unwrap())
            .collect()
    };
    (envelopes, reporter)
}

fn single_message(config: &ImportConfig, text: Value) -> (String, MemoryReporter) {
    let (envelopes, reporter) = convert(
        config,
        json!({
            "type": "private_supergroup",
            "messages": [
                {"id": 1, "type": "message", "date": "2022-03-15T06:06:11",
                 "from_id": "user123", "text": text}
            ]
        }),
    );
    let message = envelopes[0]["post"]["message"].as_str().unwrap().to_string();
    (message, reporter)
}

#[test]
fn test_complex_span_concatenation() {
    let cfg = default_config();
    let (message, _) = single_message(
        &cfg,
        json!([
            "/me says ",
            {"type": "italic", "text": "something italic"},
            " to ",
            {"type": "mention", "text": "@a.b.cexample"},
            " with umläuts and ",
            {"type": "bold", "text": "boldly emphasized"},
            " text"
        ]),
    );
    assert_eq!(
        message,
        "/me says _something italic_ to @abc with umläuts and **boldly emphasized** text"
    );
}

#[test]
fn test_pre_block_rendering() {
    let cfg = default_config();
    let (message, _) = single_message(
        &cfg,
        json!([
            "Some multiline code snippet:\n\n",
            {"type": "pre", "text": "foo\nbar\nfnord"}
        ]),
    );
    assert_eq!(
        message,
        "Some multiline code snippet:\n\n\n```\nfoo\nbar\nfnord\n```\n"
    );
}

#[test]
fn test_blockquote_and_inline_code() {
    let cfg = default_config();
    let (message, _) = single_message(
        &cfg,
        json!([
            {"type": "blockquote", "text": "wise words"},
            "and ",
            {"type": "code", "text": "let x = 1;"}
        ]),
    );
    assert_eq!(message, "\n> wise words\nand `let x = 1;`");
}

#[test]
fn test_plain_kinds_pass_through() {
    let cfg = default_config();
    let (message, reporter) = single_message(
        &cfg,
        json!([
            {"type": "link", "text": "https://example.com"},
            " ",
            {"type": "hashtag", "text": "#rust"},
            " ",
            {"type": "bot_command", "text": "/start"},
            " ",
            {"type": "phone", "text": "+41 00 000 00 00"}
        ]),
    );
    assert_eq!(message, "https://example.com #rust /start +41 00 000 00 00");
    assert!(reporter.warnings().is_empty());
}

#[test]
fn test_mention_name_resolved_and_unknown() {
    let cfg = default_config();
    let (message, reporter) = single_message(
        &cfg,
        json!([
            "ping ",
            {"type": "mention_name", "text": "D. E. Fexample", "user_id": 456},
            {"type": "mention_name", "text": "Nobody", "user_id": 999}
        ]),
    );
    assert_eq!(message, "ping @def");
    assert!(reporter.has_warning("Unknown user ID in mention: user999"));
}

#[test]
fn test_mention_without_map_passes_verbatim() {
    let cfg = config(
        r#"
chat_type = "channel"
[users]
user123 = "abc"
[import_into]
team = "example"
channel = "town square"
"#,
    );
    let (message, _) = single_message(&cfg, json!([{"type": "mention", "text": "@someone"}]));
    assert_eq!(message, "@someone");
}

#[test]
fn test_unmapped_mention_kept_with_debug() {
    let cfg = default_config();
    let (message, reporter) =
        single_message(&cfg, json!([{"type": "mention", "text": "@unmapped.person"}]));
    assert_eq!(message, "@unmapped.person");
    assert!(
        reporter
            .debugs()
            .iter()
            .any(|d| d.contains("No mapping found for mention"))
    );
}

#[test]
fn test_malformed_and_unknown_spans_dropped() {
    let cfg = default_config();
    let (message, reporter) = single_message(
        &cfg,
        json!([
            "kept ",
            {"type": "bold"},
            {"type": "spoiler", "text": "secret"},
            "also kept"
        ]),
    );
    assert_eq!(message, "kept also kept");
    assert!(reporter.has_warning("Skipping text element missing required fields"));
    assert!(reporter.has_warning("Unsupported text element type: spoiler"));
}

#[test]
fn test_timezone_shifts_epoch() {
    let mut cfg = default_config();
    cfg.timezone = "Europe/Busingen".to_string();
    let (envelopes, _) = convert(
        &cfg,
        json!({
            "type": "private_supergroup",
            "messages": [
                {"id": 1, "type": "message", "date": "2022-03-25T17:30:36",
                 "from_id": "user123", "text": "tick"}
            ]
        }),
    );
    assert_eq!(envelopes[0]["post"]["create_at"], 1_648_225_836_000_i64);
}

#[test]
fn test_empty_message_list() {
    let cfg = default_config();
    let (envelopes, reporter) = convert(
        &cfg,
        json!({"type": "private_supergroup", "messages": []}),
    );
    assert!(envelopes.is_empty());
    assert!(reporter.warnings().is_empty());
}

#[test]
fn test_text_defaults_when_field_absent() {
    let cfg = default_config();
    let (envelopes, _) = convert(
        &cfg,
        json!({
            "type": "private_supergroup",
            "messages": [
                {"id": 1, "type": "message", "date": "2022-03-15T06:06:11",
                 "from_id": "user123", "photo": "photos/p.jpg"}
            ]
        }),
    );
    assert_eq!(envelopes[0]["post"]["message"], "");
    assert_eq!(envelopes[0]["post"]["attachments"][0]["path"], "photos/p.jpg");
}

#[test]
fn test_invalid_timezone_rejected_at_construction() {
    let cfg = config(
        r#"
timezone = "Mars/Olympus_Mons"
[users]
user123 = "abc"
"#,
    );
    let reporter = MemoryReporter::new();
    let destination = Destination::Direct {
        members: cfg.member_names(),
    };
    assert!(Converter::new(&cfg, destination, &reporter).is_err());
}
