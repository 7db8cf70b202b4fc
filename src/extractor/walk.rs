//! Depth-first traversal of the suite tree

use super::document::{id_key, ReportDocument, Spec, Suite, TestCase};
use crate::Verdict;

/// A test together with the spec that lists it (if any)
#[derive(Debug, Clone, Copy)]
pub struct TestRef<'a> {
    pub test: &'a TestCase,
    pub spec: Option<&'a Spec>,
}

impl<'a> TestRef<'a> {
    /// Identity used for deduplication: the test's id, else its title.
    ///
    /// Runners that put the id and title on the spec rather than the test
    /// (Playwright) fall back to the spec's, qualified by project name so the
    /// same spec run under two projects stays two tests.
    pub fn identity(&self) -> Option<String> {
        if let Some(id) = id_key(self.test.id.as_ref()) {
            return Some(id);
        }
        if let Some(title) = self.test.title.as_ref().filter(|t| !t.is_empty()) {
            return Some(title.clone());
        }
        let spec_key = self.spec.and_then(|spec| {
            id_key(spec.id.as_ref()).or_else(|| spec.title.clone().filter(|t| !t.is_empty()))
        })?;
        match self.test.project_name.as_deref() {
            Some(project) if !project.is_empty() => Some(format!("{}/{}", spec_key, project)),
            _ => Some(spec_key),
        }
    }

    /// Human-readable name for reports
    pub fn display_name(&self) -> String {
        let base = self
            .test
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| self.spec.and_then(Spec::display_name))
            .or_else(|| id_key(self.test.id.as_ref()))
            .unwrap_or_else(|| "(untitled test)".to_string());
        match self.test.project_name.as_deref() {
            Some(project) if !project.is_empty() && self.test.title.is_none() => {
                format!("{} [{}]", base, project)
            }
            _ => base,
        }
    }

    /// Verdict of the last recorded attempt. No attempts means `Other`.
    pub fn verdict(&self) -> Verdict {
        match self.test.results.last() {
            Some(result) => result
                .status
                .as_deref()
                .map(Verdict::from_status)
                .unwrap_or(Verdict::Other),
            None => Verdict::Other,
        }
    }
}

/// Visit every test in document order: for each suite, the tests of its
/// specs, then its direct tests, then its child suites.
pub fn visit_tests<'a>(doc: &'a ReportDocument, mut visit: impl FnMut(TestRef<'a>)) {
    let mut stack: Vec<&'a Suite> = doc.suites.iter().rev().collect();
    while let Some(suite) = stack.pop() {
        for spec in &suite.specs {
            for test in &spec.tests {
                visit(TestRef {
                    test,
                    spec: Some(spec),
                });
            }
        }
        for test in &suite.tests {
            visit(TestRef { test, spec: None });
        }
        stack.extend(suite.suites.iter().rev());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> ReportDocument {
        serde_json::from_str(json).unwrap()
    }

    fn visited_ids(doc: &ReportDocument) -> Vec<String> {
        let mut ids = Vec::new();
        visit_tests(doc, |t| ids.push(t.identity().unwrap_or_default()));
        ids
    }

    #[test]
    fn visits_in_document_order() {
        let doc = doc(
            r#"{"suites":[
                {"specs":[{"tests":[{"id":"a"}]}],"tests":[{"id":"b"}],
                 "suites":[{"tests":[{"id":"c"}],"suites":[{"tests":[{"id":"d"}]}]},{"tests":[{"id":"e"}]}]},
                {"tests":[{"id":"f"}]}
            ]}"#,
        );
        assert_eq!(visited_ids(&doc), vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn nested_suites_reach_the_innermost_test() {
        // serde_json caps nesting at 128; each level here costs two
        let mut json = String::new();
        for _ in 0..50 {
            json.push_str(r#"{"suites":["#);
        }
        json.push_str(r#"{"tests":[{"id":"deep"}]}"#);
        for _ in 0..50 {
            json.push_str("]}");
        }
        let doc = doc(&json);
        assert_eq!(visited_ids(&doc), vec!["deep"]);
    }

    #[test]
    fn identity_prefers_id_then_title() {
        let doc = doc(
            r#"{"suites":[{"tests":[{"id":"t1","title":"first"},{"title":"second"},{"id":7}]}]}"#,
        );
        assert_eq!(visited_ids(&doc), vec!["t1", "second", "7"]);
    }

    #[test]
    fn identity_falls_back_to_spec_and_project() {
        let doc = doc(
            r#"{"suites":[{"specs":[{"id":"spec-1","title":"logs in","tests":[
                {"projectName":"chromium","results":[]},
                {"projectName":"firefox","results":[]}
            ]}]}]}"#,
        );
        assert_eq!(visited_ids(&doc), vec!["spec-1/chromium", "spec-1/firefox"]);
    }

    #[test]
    fn identity_none_without_any_name() {
        let doc = doc(r#"{"suites":[{"tests":[{"results":[]}]}]}"#);
        let mut identities = Vec::new();
        visit_tests(&doc, |t| identities.push(t.identity()));
        assert_eq!(identities, vec![None]);
    }

    #[test]
    fn verdict_uses_last_attempt() {
        let doc = doc(
            r#"{"suites":[{"tests":[
                {"id":"a","results":[{"status":"failed"},{"status":"passed"}]},
                {"id":"b","results":[{"status":"passed"},{"status":"failed"}]},
                {"id":"c","results":[]},
                {"id":"d","results":[{"status":"timedOut"}]},
                {"id":"e","results":[{}]}
            ]}]}"#,
        );
        let mut verdicts = Vec::new();
        visit_tests(&doc, |t| verdicts.push(t.verdict()));
        assert_eq!(
            verdicts,
            vec![
                Verdict::Passed,
                Verdict::Failed,
                Verdict::Other,
                Verdict::Other,
                Verdict::Other
            ]
        );
    }

    #[test]
    fn display_name_uses_spec_title_and_project() {
        let doc = doc(
            r#"{"suites":[{"specs":[{"title":"logs in","tests":[{"projectName":"webkit"}]}],
                "tests":[{"title":"standalone"},{}]}]}"#,
        );
        let mut names = Vec::new();
        visit_tests(&doc, |t| names.push(t.display_name()));
        assert_eq!(names, vec!["logs in [webkit]", "standalone", "(untitled test)"]);
    }
}
