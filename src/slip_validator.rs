use crate::models::*;
use crate::processing::SlipFieldExtractor;
use crate::utils::{Calendar, SystemCalendar};
use crate::validation::{IdentifierParser, RiskScorer, TimestampVerifier};
use log::{debug, info};

pub struct SlipValidator<C: Calendar = SystemCalendar> {
    policy: ScoringPolicy,
    calendar: C,
    verifier: TimestampVerifier,
}

impl Default for SlipValidator<SystemCalendar> {
    fn default() -> Self {
        SlipValidator::new(ScoringPolicy::default(), SystemCalendar)
    }
}

impl<C: Calendar> SlipValidator<C> {
    pub fn new(policy: ScoringPolicy, calendar: C) -> Self {
        let verifier = TimestampVerifier::new(policy.time_tolerance_minutes);
        SlipValidator {
            policy,
            calendar,
            verifier,
        }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Extract fields from an OCR document, then validate them.
    pub fn validate_document(&self, document: &OcrDocument, expected: &ExpectedValues) -> SlipValidation {
        let fields = SlipFieldExtractor::extract(document);
        self.validate_slip(&fields, expected)
    }

    // Main validation function: every check adds its budget to max_score and
    // its earned credit to score
    pub fn validate_slip(&self, fields: &ExtractedFields, expected: &ExpectedValues) -> SlipValidation {
        let mut result = SlipValidation {
            is_valid: false,
            identifier: None,
            risk: None,
            time_check: None,
            amount_check: None,
            recipient_check: None,
            score: 0,
            max_score: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
        };

        // Step 1: Nothing to score without a successful extraction and a reference
        if !fields.success {
            result.errors.push(ValidationIssue::new(
                ValidationIssueType::Extraction,
                format!(
                    "extraction failed: {}",
                    fields.error.as_deref().unwrap_or("unknown error")
                ),
            ));
            info!("slip rejected: extraction failed");
            return result;
        }
        let id = match fields.transaction_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id,
            _ => {
                result.errors.push(ValidationIssue::new(
                    ValidationIssueType::Extraction,
                    "no transaction reference found on slip",
                ));
                info!("slip rejected: no transaction reference");
                return result;
            }
        };

        let current_year = self.calendar.current_year();

        // Step 2: Grammar and authenticity
        self.check_authenticity(id, current_year, &mut result);

        // Step 3: Embedded time against the printed time
        self.check_time(fields, &mut result);

        // Step 4: Amount
        self.check_amount(fields, expected, &mut result);

        // Step 5: Recipient
        self.check_recipient(fields, expected, &mut result);

        // Step 6: OCR confidence
        self.check_confidence(fields.ocr_confidence, &mut result);

        result.is_valid =
            result.errors.is_empty() && result.score_ratio() >= self.policy.pass_threshold;

        info!(
            "slip {} scored {}/{} ({} errors, {} warnings): {}",
            id,
            result.score,
            result.max_score,
            result.errors.len(),
            result.warnings.len(),
            if result.is_valid { "accepted" } else { "rejected" }
        );
        result
    }

    fn check_authenticity(&self, id: &str, current_year: i32, result: &mut SlipValidation) {
        result.max_score += self.policy.authenticity_points;

        let parsed = match IdentifierParser::parse_strict(id, current_year) {
            Ok(parsed) => parsed,
            Err(err) => {
                let issue_type = if err.is_semantic() {
                    ValidationIssueType::Semantic
                } else {
                    ValidationIssueType::Format
                };
                result.errors.push(ValidationIssue::new(
                    issue_type,
                    format!("invalid transaction reference {}: {}", id, err),
                ));
                result.risk = Some(RiskScorer::assess(id, current_year));
                return;
            }
        };

        let risk = RiskScorer::assess_parsed(&parsed, current_year);
        match risk.risk_level {
            RiskLevel::Low => result.score += self.policy.authenticity_points,
            RiskLevel::Medium => {
                result.score += self.policy.medium_risk_points;
                result.warnings.push(ValidationIssue::new(
                    ValidationIssueType::Risk,
                    format!("medium risk: {}", risk.reasons.join("; ")),
                ));
            }
            RiskLevel::High => {
                result.errors.push(ValidationIssue::new(
                    ValidationIssueType::Risk,
                    format!("high risk: {}", risk.reasons.join("; ")),
                ));
            }
        }

        result.identifier = Some(parsed);
        result.risk = Some(risk);
    }

    fn check_time(&self, fields: &ExtractedFields, result: &mut SlipValidation) {
        result.max_score += self.policy.time_points;

        // An invalid reference is already a hard error
        let parsed = match &result.identifier {
            Some(parsed) => parsed,
            None => return,
        };

        let check = match (&fields.date_time_text, &fields.time) {
            (Some(text), _) => self.verifier.verify_parsed(parsed, text),
            (None, Some(time)) => Self::compare_hour_minute(parsed, time),
            (None, None) => {
                result.warnings.push(ValidationIssue::new(
                    ValidationIssueType::Time,
                    "no printed time to cross-check against the reference",
                ));
                return;
            }
        };

        if check.time_match {
            result.score += self.policy.time_points;
        } else {
            result
                .warnings
                .push(ValidationIssue::new(ValidationIssueType::Time, check.message.clone()));
        }
        debug!("time check: {:?}", check);
        result.time_check = Some(check);
    }

    /// Exact hour and minute comparison, used when only a pre-parsed time is available.
    fn compare_hour_minute(parsed: &ParsedIdentifier, time: &SlipTime) -> DateTimeCheck {
        let time_match = parsed.hour == time.hour && parsed.minute == time.minute;
        let identifier_minutes = parsed.hour * 60 + parsed.minute;
        let slip_minutes = time.hour * 60 + time.minute;
        let extracted_time = format!("{:02}:{:02}", time.hour, time.minute);

        DateTimeCheck {
            time_match,
            message: if time_match {
                "time matches".to_string()
            } else {
                format!(
                    "time mismatch: reference {}, slip {}",
                    parsed.time(),
                    extracted_time
                )
            },
            identifier_time: Some(parsed.time()),
            extracted_time: Some(extracted_time),
            minute_difference: Some(identifier_minutes.abs_diff(slip_minutes)),
        }
    }

    fn check_amount(&self, fields: &ExtractedFields, expected: &ExpectedValues, result: &mut SlipValidation) {
        result.max_score += self.policy.amount_presence_points;
        if fields.amount.is_some() {
            result.score += self.policy.amount_presence_points;
        } else {
            result.warnings.push(ValidationIssue::new(
                ValidationIssueType::Amount,
                "no amount found on slip",
            ));
        }

        let expected_amount = match expected.amount {
            Some(amount) => amount,
            None => return,
        };
        result.max_score += self.policy.amount_match_points;

        let matches = fields
            .amount
            .map_or(false, |amount| (amount - expected_amount).abs() <= self.policy.amount_tolerance);
        if matches {
            result.score += self.policy.amount_match_points;
        } else {
            let issue = ValidationIssue::new(
                ValidationIssueType::Amount,
                match fields.amount {
                    Some(amount) => format!(
                        "amount mismatch: slip shows {:.2}, expected {:.2}",
                        amount, expected_amount
                    ),
                    None => format!("expected amount {:.2} could not be read", expected_amount),
                },
            );
            if self.policy.amount_mismatch_is_error {
                result.errors.push(issue);
            } else {
                result.warnings.push(issue);
            }
        }

        result.amount_check = Some(AmountCheck {
            extracted: fields.amount,
            expected: Some(expected_amount),
            matches,
        });
    }

    fn check_recipient(&self, fields: &ExtractedFields, expected: &ExpectedValues, result: &mut SlipValidation) {
        let expected_name = match expected.recipient_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => return,
        };
        result.max_score += self.policy.recipient_points;

        let matches = fields
            .recipient_name
            .as_deref()
            .map_or(false, |name| names_match(name, expected_name));
        if matches {
            result.score += self.policy.recipient_points;
        } else {
            result.warnings.push(ValidationIssue::new(
                ValidationIssueType::Recipient,
                format!(
                    "recipient {:?} does not match expected {:?}",
                    fields.recipient_name.as_deref().unwrap_or(""),
                    expected_name
                ),
            ));
        }

        result.recipient_check = Some(RecipientCheck {
            extracted: fields.recipient_name.clone(),
            expected: expected_name.to_string(),
            matches,
        });
    }

    fn check_confidence(&self, confidence: f32, result: &mut SlipValidation) {
        result.max_score += self.policy.confidence_points;
        if confidence >= self.policy.high_confidence_threshold {
            result.score += self.policy.confidence_points;
        } else if confidence >= self.policy.medium_confidence_threshold {
            result.score += self.policy.medium_confidence_points;
            result.warnings.push(ValidationIssue::new(
                ValidationIssueType::Confidence,
                format!("moderate OCR confidence {:.1}", confidence),
            ));
        } else {
            result.warnings.push(ValidationIssue::new(
                ValidationIssueType::Confidence,
                format!("low OCR confidence {:.1}", confidence),
            ));
        }
    }
}

/// Case and whitespace insensitive containment, in either direction.
fn names_match(found: &str, expected: &str) -> bool {
    let squash = |s: &str| -> String {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    };
    let found = squash(found);
    let expected = squash(expected);
    !found.is_empty() && !expected.is_empty() && (found.contains(&expected) || expected.contains(&found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::FixedCalendar;

    fn validator() -> SlipValidator<FixedCalendar> {
        SlipValidator::new(ScoringPolicy::default(), FixedCalendar(2568))
    }

    fn good_fields() -> ExtractedFields {
        ExtractedFields {
            success: true,
            error: None,
            transaction_id: Some("015298170819BQR02651".to_string()),
            amount: Some(1500.0),
            sender_name: Some("นาย สมชาย ใจดี".to_string()),
            recipient_name: Some("บริษัท ตัวอย่าง จำกัด".to_string()),
            date_time_text: Some("16 ก.ย. 68 17:09 น.".to_string()),
            time: Some(SlipTime { hour: 17, minute: 9, second: None }),
            ocr_confidence: 90.5,
        }
    }

    fn full_expectation() -> ExpectedValues {
        ExpectedValues {
            amount: Some(1500.0),
            recipient_name: Some("ตัวอย่าง".to_string()),
        }
    }

    fn has_issue(issues: &[ValidationIssue], issue_type: ValidationIssueType) -> bool {
        issues.iter().any(|issue| issue.issue_type == issue_type)
    }

    #[test]
    fn clean_slip_is_accepted_with_full_score() {
        let result = validator().validate_slip(&good_fields(), &full_expectation());
        assert!(result.is_valid, "{:?}", result);
        assert_eq!(result.score, 100);
        assert_eq!(result.max_score, 100);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.identifier.unwrap().type_code, "BQR0");
        assert!(result.time_check.unwrap().time_match);
        assert!(result.amount_check.unwrap().matches);
        assert!(result.recipient_check.unwrap().matches);
    }

    #[test]
    fn failed_extraction_short_circuits() {
        let fields = ExtractedFields {
            success: false,
            error: Some("OCR produced no text".to_string()),
            ..ExtractedFields::default()
        };
        let result = validator().validate_slip(&fields, &full_expectation());
        assert!(!result.is_valid);
        assert_eq!(result.max_score, 0);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("OCR produced no text"));
    }

    #[test]
    fn missing_reference_short_circuits() {
        let fields = ExtractedFields {
            transaction_id: None,
            ..good_fields()
        };
        let result = validator().validate_slip(&fields, &full_expectation());
        assert!(!result.is_valid);
        assert_eq!(result.max_score, 0);
        assert!(has_issue(&result.errors, ValidationIssueType::Extraction));
    }

    #[test]
    fn invalid_reference_is_a_hard_error() {
        let fields = ExtractedFields {
            transaction_id: Some("015398170819BQR02651".to_string()),
            ..good_fields()
        };
        let result = validator().validate_slip(&fields, &full_expectation());
        assert!(!result.is_valid);
        assert!(has_issue(&result.errors, ValidationIssueType::Format));
        assert_eq!(result.risk.unwrap().risk_level, RiskLevel::High);

        let fields = ExtractedFields {
            transaction_id: Some("015298250819BQR02651".to_string()),
            ..good_fields()
        };
        let result = validator().validate_slip(&fields, &full_expectation());
        assert!(has_issue(&result.errors, ValidationIssueType::Semantic));
    }

    #[test]
    fn medium_risk_earns_partial_credit() {
        let fields = ExtractedFields {
            transaction_id: Some("015298170819BQR01111".to_string()),
            ..good_fields()
        };
        let result = validator().validate_slip(&fields, &full_expectation());
        assert_eq!(result.score, 85);
        assert!(result.is_valid);
        assert!(has_issue(&result.warnings, ValidationIssueType::Risk));
    }

    #[test]
    fn high_risk_rejects_regardless_of_score() {
        let fields = ExtractedFields {
            transaction_id: Some("015298000000ZZZ91111".to_string()),
            date_time_text: Some("00:00".to_string()),
            ..good_fields()
        };
        let result = validator().validate_slip(&fields, &full_expectation());
        assert!(!result.is_valid);
        assert!(result.score_ratio() >= 0.70);
        assert!(has_issue(&result.errors, ValidationIssueType::Risk));
    }

    #[test]
    fn amount_mismatch_only_costs_its_points_by_default() {
        let expected = ExpectedValues {
            amount: Some(1600.0),
            ..full_expectation()
        };
        let result = validator().validate_slip(&good_fields(), &expected);
        assert_eq!(result.score, 80);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(has_issue(&result.warnings, ValidationIssueType::Amount));
        assert!(!result.amount_check.unwrap().matches);
    }

    #[test]
    fn amount_mismatch_can_be_made_an_error() {
        let policy = ScoringPolicy {
            amount_mismatch_is_error: true,
            ..ScoringPolicy::default()
        };
        let expected = ExpectedValues {
            amount: Some(1600.0),
            ..full_expectation()
        };
        let result = SlipValidator::new(policy, FixedCalendar(2568)).validate_slip(&good_fields(), &expected);
        assert_eq!(result.score, 80);
        assert!(!result.is_valid);
        assert!(has_issue(&result.errors, ValidationIssueType::Amount));
    }

    #[test]
    fn amount_within_tolerance_matches() {
        let expected = ExpectedValues {
            amount: Some(1500.01),
            ..full_expectation()
        };
        let result = validator().validate_slip(&good_fields(), &expected);
        assert!(result.amount_check.unwrap().matches);
    }

    #[test]
    fn time_mismatch_is_only_a_warning() {
        let fields = ExtractedFields {
            date_time_text: Some("16 ก.ย. 68 17:20 น.".to_string()),
            ..good_fields()
        };
        let result = validator().validate_slip(&fields, &full_expectation());
        assert_eq!(result.score, 80);
        assert!(result.is_valid);
        assert!(has_issue(&result.warnings, ValidationIssueType::Time));
        assert!(!result.time_check.unwrap().time_match);
    }

    #[test]
    fn parsed_time_fallback_is_exact() {
        let fields = ExtractedFields {
            date_time_text: None,
            time: Some(SlipTime { hour: 17, minute: 8, second: None }),
            ..good_fields()
        };
        assert!(validator().validate_slip(&fields, &full_expectation()).time_check.unwrap().time_match);

        let fields = ExtractedFields {
            date_time_text: None,
            time: Some(SlipTime { hour: 17, minute: 9, second: None }),
            ..good_fields()
        };
        let check = validator().validate_slip(&fields, &full_expectation()).time_check.unwrap();
        assert!(!check.time_match);
        assert_eq!(check.minute_difference, Some(1));
    }

    #[test]
    fn optional_checks_only_count_when_expected() {
        let result = validator().validate_slip(&good_fields(), &ExpectedValues::default());
        assert_eq!(result.max_score, 70);
        assert_eq!(result.score, 70);
        assert!(result.amount_check.is_none());
        assert!(result.recipient_check.is_none());
    }

    #[test]
    fn low_score_rejects_without_errors() {
        let fields = ExtractedFields {
            date_time_text: None,
            time: None,
            ocr_confidence: 40.0,
            ..good_fields()
        };
        let result = validator().validate_slip(&fields, &ExpectedValues::default());
        assert!(result.errors.is_empty());
        assert_eq!(result.score, 40);
        assert_eq!(result.max_score, 70);
        assert!(!result.is_valid);
    }

    #[test]
    fn confidence_bands() {
        let score_for = |confidence: f32| {
            let fields = ExtractedFields {
                ocr_confidence: confidence,
                ..good_fields()
            };
            validator().validate_slip(&fields, &ExpectedValues::default()).score
        };
        assert_eq!(score_for(95.0), 70);
        assert_eq!(score_for(70.0), 65);
        assert_eq!(score_for(30.0), 60);
    }

    #[test]
    fn recipient_match_ignores_case_and_spaces() {
        assert!(names_match("ACME  Co", "acmeco"));
        assert!(names_match("Acme", "ACME CO LTD"));
        assert!(!names_match("Acme", "Globex"));
        assert!(!names_match("", "Acme"));
    }

    #[test]
    fn pass_threshold_comes_from_policy() {
        let policy = ScoringPolicy {
            pass_threshold: 0.9,
            ..ScoringPolicy::default()
        };
        let fields = ExtractedFields {
            transaction_id: Some("015298170819BQR01111".to_string()),
            ..good_fields()
        };
        let result = SlipValidator::new(policy, FixedCalendar(2568)).validate_slip(&fields, &full_expectation());
        assert_eq!(result.score, 85);
        assert!(!result.is_valid);
    }
}
