//! Variable resolution and `$(NAME)` template expansion
//!
//! Values are looked up caller override first, then process environment (only
//! for names the configuration declares), then the configured default. Values
//! may themselves reference other variables and are expanded recursively at
//! resolution time, so an override is visible through every default that
//! mentions it.
//!
//! `$$` produces a literal `$`. A `$` that is not followed by `(` or `$` is
//! left untouched, so shell variables such as `$HOME` pass through.

use std::collections::BTreeMap;

use tracing::debug;

use crate::types::{StintError, StintResult};

/// A piece of a parsed command template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Reference(String),
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn invalid_reference(template: &str, reason: &str) -> StintError {
    StintError::Config(format!(
        "Invalid variable reference in '{}': {}",
        template, reason
    ))
}

/// Split a template into literal text and variable references
pub fn parse_template(template: &str) -> StintResult<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        literal.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(stripped) = after.strip_prefix('$') {
            literal.push('$');
            rest = stripped;
        } else if let Some(inner) = after.strip_prefix('(') {
            let end = inner
                .find(')')
                .ok_or_else(|| invalid_reference(template, "unterminated '$('"))?;
            let name = &inner[..end];
            if !is_valid_name(name) {
                return Err(invalid_reference(
                    template,
                    &format!(
                        "'{}' is not a variable name (write '$$(' for a literal '$(')",
                        name
                    ),
                ));
            }
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Reference(name.to_string()));
            rest = &inner[end + 1..];
        } else {
            literal.push('$');
            rest = after;
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Names referenced directly by a template, in order of appearance
pub fn references(template: &str) -> StintResult<Vec<String>> {
    Ok(parse_template(template)?
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Reference(name) => Some(name),
            Segment::Literal(_) => None,
        })
        .collect())
}

/// Variable set threaded through resolution
#[derive(Debug, Clone, Default)]
pub struct Variables {
    defaults: BTreeMap<String, String>,
    environment: BTreeMap<String, String>,
    overrides: BTreeMap<String, String>,
}

impl Variables {
    pub fn new(defaults: BTreeMap<String, String>) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    /// Add caller-supplied overrides (`NAME=value` arguments)
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in overrides {
            if !self.defaults.contains_key(&name) {
                debug!(variable = %name, "override for a variable no task references");
            }
            self.overrides.insert(name, value);
        }
        self
    }

    /// Take values from the process environment for declared variables only
    pub fn with_environment<I>(mut self, environment: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in environment {
            if self.defaults.contains_key(&name) {
                debug!(variable = %name, "using value from environment");
                self.environment.insert(name, value);
            }
        }
        self
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Raw, unexpanded value of a variable
    pub fn get(&self, name: &str) -> Option<&str> {
        self.overrides
            .get(name)
            .or_else(|| self.environment.get(name))
            .or_else(|| self.defaults.get(name))
            .map(String::as_str)
    }

    /// Names of all declared variables
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.defaults.keys().map(String::as_str)
    }

    /// Fully expanded value of a variable
    pub fn value(&self, name: &str) -> StintResult<String> {
        let mut stack = Vec::new();
        self.expand_reference(name, name, &mut stack)
    }

    /// Expand every `$(NAME)` in a template
    pub fn expand(&self, template: &str) -> StintResult<String> {
        let mut stack = Vec::new();
        self.expand_with_stack(template, &mut stack)
    }

    /// Check that every declared variable expands: no undefined references, no cycles
    pub fn validate(&self) -> StintResult<()> {
        for name in self.defaults.keys() {
            self.value(name)?;
        }
        Ok(())
    }

    fn expand_with_stack(&self, template: &str, stack: &mut Vec<String>) -> StintResult<String> {
        let mut output = String::with_capacity(template.len());
        for segment in parse_template(template)? {
            match segment {
                Segment::Literal(text) => output.push_str(&text),
                Segment::Reference(name) => {
                    output.push_str(&self.expand_reference(&name, template, stack)?)
                }
            }
        }
        Ok(output)
    }

    fn expand_reference(
        &self,
        name: &str,
        context: &str,
        stack: &mut Vec<String>,
    ) -> StintResult<String> {
        if stack.iter().any(|seen| seen == name) {
            let mut cycle = stack.clone();
            cycle.push(name.to_string());
            return Err(StintError::Config(format!(
                "Circular variable reference: {}",
                cycle.join(" -> ")
            )));
        }

        let raw = self
            .get(name)
            .ok_or_else(|| StintError::UndefinedVariable {
                name: name.to_string(),
                context: format!("'{}'", context),
            })?
            .to_string();

        stack.push(name.to_string());
        let expanded = self.expand_with_stack(&raw, stack);
        stack.pop();
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_template_segments() {
        let segments = parse_template("mypy --python-version $(PY_VERSION) src").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Literal("mypy --python-version ".to_string()),
                Segment::Reference("PY_VERSION".to_string()),
                Segment::Literal(" src".to_string()),
            ]
        );
    }

    #[test]
    fn test_dollar_escapes_and_shell_variables() {
        let vars = Variables::new(BTreeMap::new());
        assert_eq!(vars.expand("echo $$(date) $HOME $").unwrap(), "echo $(date) $HOME $");
    }

    #[test]
    fn test_invalid_reference_rejected() {
        assert!(parse_template("echo $(date").is_err());
        let err = parse_template("echo $(shell date)").unwrap_err();
        assert!(err.to_string().contains("$$("));
    }

    #[test]
    fn test_nested_defaults_see_overrides() {
        let vars = Variables::new(defaults(&[
            ("PROJECT_NAME", "astrometry_net_client"),
            ("TEST_ARGS", "--cov=$(PROJECT_NAME) -v"),
        ]));
        assert_eq!(
            vars.expand("pytest $(TEST_ARGS)").unwrap(),
            "pytest --cov=astrometry_net_client -v"
        );

        let vars = vars.with_overrides([("PROJECT_NAME".to_string(), "pkg".to_string())]);
        assert_eq!(vars.expand("pytest $(TEST_ARGS)").unwrap(), "pytest --cov=pkg -v");
    }

    #[test]
    fn test_precedence_override_environment_default() {
        let vars = Variables::new(defaults(&[("PY_VERSION", "3.8"), ("PYTHON", "python3")]))
            .with_environment([
                ("PY_VERSION".to_string(), "3.10".to_string()),
                ("UNRELATED".to_string(), "x".to_string()),
            ]);
        assert_eq!(vars.get("PY_VERSION"), Some("3.10"));
        assert!(!vars.is_defined("UNRELATED"));

        let vars = vars.with_overrides([("PY_VERSION".to_string(), "3.11".to_string())]);
        assert_eq!(vars.get("PY_VERSION"), Some("3.11"));
        assert_eq!(vars.get("PYTHON"), Some("python3"));
    }

    #[test]
    fn test_undefined_variable() {
        let vars = Variables::new(BTreeMap::new());
        let err = vars.expand("black $(BLACK_ARGS)").unwrap_err();
        assert!(matches!(err, StintError::UndefinedVariable { ref name, .. } if name == "BLACK_ARGS"));
    }

    #[test]
    fn test_cycle_detected_by_validate() {
        let vars = Variables::new(defaults(&[("A", "$(B)"), ("B", "x $(A)")]));
        let err = vars.validate().unwrap_err();
        assert!(err.to_string().contains("A -> B -> A"));
    }

    #[test]
    fn test_references() {
        assert_eq!(
            references("$(A) $$(B) $(C)").unwrap(),
            vec!["A".to_string(), "C".to_string()]
        );
    }
}
