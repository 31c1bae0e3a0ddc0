// Static check: scan every Rust source file for tracing calls that carry
// patient identifiers, drug lists, user contact details or generated
// clinical text. Logs may only carry opaque record ids, counts and errors.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    /// Field names and interpolations that MUST NOT appear in tracing macros.
    const PHI_PATTERNS: &[&str] = &[
        // Patient and record content
        "patient_id",
        "patient =",
        "drug =",
        "drugs =",
        "drug_name",
        "%drug",
        "?drugs",
        "?record.drugs",
        "diplotype",
        "phenotype",
        "gene_profiles =",
        "recommendation",
        "ai_explanation",
        // User identity
        "email",
        "user.name",
        "user_name",
        "auditor_name",
        // Free text
        "prompt =",
        "%prompt",
        "search_term",
        "%term",
    ];

    /// Files that reference the patterns outside tracing calls.
    const ALLOWLIST: &[&str] = &["phi_audit.rs"];

    #[test]
    fn no_phi_in_tracing_calls() {
        let src_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
        assert!(src_dir.exists(), "Source directory not found: {}", src_dir.display());

        let mut violations = Vec::new();
        scan_directory(&src_dir, &mut violations);

        if !violations.is_empty() {
            let report = violations
                .iter()
                .map(|(file, line_num, line, pattern)| {
                    format!("  {}:{}: found '{}' in: {}", file, line_num, pattern, line.trim())
                })
                .collect::<Vec<_>>()
                .join("\n");
            panic!(
                "PHI AUDIT FAILED: {} violation(s) found in tracing calls:\n{}\n\n\
                 Fix: log record ids or counts instead.",
                violations.len(),
                report
            );
        }
    }

    #[test]
    fn phi_patterns_list_is_not_empty() {
        assert!(
            PHI_PATTERNS.len() >= 10,
            "PHI_PATTERNS should contain at least 10 patterns, found {}",
            PHI_PATTERNS.len()
        );
    }

    #[test]
    fn scanner_detects_known_violation() {
        let call = r#"tracing::info!(patient_id = %record.patient_id, "analysis recorded");"#;
        assert!(find_violation(call).is_some(), "Should flag: {call}");

        let call = r#"tracing::debug!(drugs = ?record.drugs, "report opened");"#;
        assert!(find_violation(call).is_some(), "Should flag: {call}");
    }

    #[test]
    fn scanner_passes_clean_tracing() {
        let call = r#"tracing::info!(record_id = %record.id, drug_count = 2, "analysis recorded");"#;
        assert_eq!(find_violation(call), None, "Clean call flagged: {call}");
    }

    fn find_violation(call: &str) -> Option<&'static str> {
        PHI_PATTERNS.iter().copied().find(|p| call.contains(p))
    }

    fn scan_directory(dir: &Path, violations: &mut Vec<(String, usize, String, String)>) {
        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(_) => return,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                scan_directory(&path, violations);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                scan_file(&path, violations);
            }
        }
    }

    fn paren_delta(text: &str) -> i32 {
        text.chars().fold(0, |depth, ch| match ch {
            '(' => depth + 1,
            ')' => depth - 1,
            _ => depth,
        })
    }

    fn scan_file(path: &Path, violations: &mut Vec<(String, usize, String, String)>) {
        let filename = path.file_name().unwrap_or_default().to_string_lossy();
        if ALLOWLIST.iter().any(|a| filename.contains(a)) {
            return;
        }

        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };

        let relative_path = path
            .strip_prefix(Path::new(env!("CARGO_MANIFEST_DIR")).join("src"))
            .unwrap_or(path)
            .display()
            .to_string();

        let lines: Vec<&str> = content.lines().collect();
        let mut i = 0;
        while i < lines.len() {
            let trimmed = lines[i].trim();
            if !trimmed.starts_with("tracing::") {
                i += 1;
                continue;
            }

            // Join the macro call across lines.
            let mut call = String::from(trimmed);
            let start_line = i + 1;
            let mut depth = paren_delta(trimmed);
            let mut j = i + 1;
            while depth > 0 && j < lines.len() {
                let next = lines[j].trim();
                call.push(' ');
                call.push_str(next);
                depth += paren_delta(next);
                j += 1;
            }

            for pattern in PHI_PATTERNS {
                if call.contains(pattern) {
                    violations.push((
                        relative_path.clone(),
                        start_line,
                        call.clone(),
                        pattern.to_string(),
                    ));
                }
            }
            i = j;
        }
    }
}
