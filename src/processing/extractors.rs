// Field extraction from one OCR'd slip. Only the transaction reference is
// held to a grammar; amount, names and the printed timestamp are
// best-effort reads for the slip validator to cross-check.
use crate::models::{ExtractedFields, OcrDocument, SlipTime};
use crate::processing::candidates::extract_identifier;
use crate::processing::normalizer::normalize_numerals;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

const MAX_NAME_LENGTH: usize = 60;

lazy_static! {
    static ref AMOUNT_PATTERNS: Vec<Regex> = vec![
        // Labelled amount
        Regex::new(r"(?i)(?:amount|จำนวนเงิน|จำนวน|ยอดเงิน|ยอดโอน)\s*[:：]?\s*(?:THB|฿)?\s*([0-9][0-9,]*\.[0-9]{2})").unwrap(),
        // Amount followed by currency
        Regex::new(r"(?i)([0-9][0-9,]*\.[0-9]{2})\s*(?:บาท|THB|baht)").unwrap(),
        // Currency sign then amount
        Regex::new(r"(?:฿|THB)\s*([0-9][0-9,]*\.[0-9]{2})").unwrap(),
    ];

    static ref TIME_PATTERN: Regex =
        Regex::new(r"([0-2]?[0-9])\s*:\s*([0-5][0-9])(?:\s*:\s*([0-5][0-9]))?").unwrap();

    static ref DATE_PATTERN: Regex = Regex::new(
        r"(?i)[0-9]{1,2}\s*(?:[/\-.]\s*[0-9]{1,2}\s*[/\-.]\s*[0-9]{2,4}|[ก-ฮ]{1,2}\.\s*[ก-ฮ]{1,2}\.|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*)"
    ).unwrap();

    static ref SENDER_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)(?:^|\s)(?:from|จาก|ผู้โอน)\s*[:：]?\s*(.+)$").unwrap(),
    ];

    static ref RECIPIENT_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)(?:^|\s)(?:to|ไปยัง|ถึง|ผู้รับ)\s*[:：]?\s*(.+)$").unwrap(),
    ];
}

pub struct SlipFieldExtractor;

impl SlipFieldExtractor {
    /// Pull every field the validator consumes out of one OCR document.
    pub fn extract(document: &OcrDocument) -> ExtractedFields {
        let ocr_confidence = Self::document_confidence(document);

        let raw_lines = Self::raw_lines(document);
        if raw_lines.iter().all(|line| line.trim().is_empty()) {
            return ExtractedFields {
                success: false,
                error: Some("OCR produced no text".to_string()),
                ocr_confidence,
                ..ExtractedFields::default()
            };
        }

        // Names keep their Thai spelling; digits are normalized everywhere else
        let lines: Vec<String> = raw_lines.iter().map(|line| normalize_numerals(line)).collect();
        let date_time_text = Self::extract_date_time_line(&lines);
        let time = date_time_text.as_deref().and_then(Self::parse_time);

        let fields = ExtractedFields {
            success: true,
            error: None,
            transaction_id: extract_identifier(&raw_lines.join("\n")),
            amount: Self::extract_amount(&lines),
            sender_name: Self::extract_name(&raw_lines, &SENDER_PATTERNS),
            recipient_name: Self::extract_name(&raw_lines, &RECIPIENT_PATTERNS),
            date_time_text,
            time,
            ocr_confidence,
        };
        debug!("extracted slip fields: {:?}", fields);
        fields
    }

    /// The document-level score, else the mean line confidence.
    pub fn document_confidence(document: &OcrDocument) -> f32 {
        if let Some(confidence) = document.confidence {
            return confidence;
        }
        if document.lines.is_empty() {
            return 0.0;
        }
        let total: f32 = document.lines.iter().map(|line| line.confidence).sum();
        total / document.lines.len() as f32
    }

    /// Per-line OCR output when present, else the text split on newlines.
    fn raw_lines(document: &OcrDocument) -> Vec<String> {
        if document.lines.is_empty() {
            document.text.lines().map(str::to_string).collect()
        } else {
            document.lines.iter().map(|line| line.text.clone()).collect()
        }
    }

    pub fn extract_amount(lines: &[String]) -> Option<f64> {
        for pattern in AMOUNT_PATTERNS.iter() {
            for line in lines {
                if let Some(captures) = pattern.captures(line) {
                    if let Some(matched) = captures.get(1) {
                        if let Ok(value) = matched.as_str().replace(',', "").parse::<f64>() {
                            return Some(value);
                        }
                    }
                }
            }
        }
        None
    }

    /// First line carrying a clock time, preferring one that also has a date.
    pub fn extract_date_time_line(lines: &[String]) -> Option<String> {
        let with_time: Vec<&String> = lines.iter().filter(|line| TIME_PATTERN.is_match(line)).collect();
        with_time
            .iter()
            .find(|line| DATE_PATTERN.is_match(line))
            .or_else(|| with_time.first())
            .map(|line| line.trim().to_string())
    }

    pub fn parse_time(text: &str) -> Option<SlipTime> {
        let captures = TIME_PATTERN.captures(text)?;
        let hour: u32 = captures.get(1)?.as_str().parse().ok()?;
        let minute: u32 = captures.get(2)?.as_str().parse().ok()?;
        let second = captures.get(3).and_then(|m| m.as_str().parse().ok());
        if hour > 23 {
            return None;
        }
        Some(SlipTime { hour, minute, second })
    }

    fn extract_name(lines: &[String], patterns: &[Regex]) -> Option<String> {
        for pattern in patterns {
            for line in lines {
                if let Some(captures) = pattern.captures(line) {
                    if let Some(matched) = captures.get(1) {
                        let value = matched.as_str().trim();
                        if Self::is_plausible_name(value) {
                            return Some(value.to_string());
                        }
                    }
                }
            }
        }
        None
    }

    fn is_plausible_name(value: &str) -> bool {
        !value.is_empty()
            && value.chars().count() <= MAX_NAME_LENGTH
            && value.chars().any(|c| c.is_alphabetic())
    }
}
