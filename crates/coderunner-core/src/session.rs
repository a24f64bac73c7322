//! The last-submitted build configuration.

use serde::Serialize;

/// Ordered run arguments keyed by their positional name.
///
/// Insertion order is argument order. Re-inserting an existing key
/// replaces its value without moving it.
///
/// # Examples
///
/// ```
/// use coderunner_core::session::SubmissionArgs;
///
/// let mut args = SubmissionArgs::new();
/// args.insert("1", "alpha");
/// args.insert("2", "beta");
/// args.insert("1", "gamma");
/// assert_eq!(args.values().collect::<Vec<_>>(), ["gamma", "beta"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionArgs(Vec<(String, String)>);

impl SubmissionArgs {
    /// Creates an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the value for `key`.
    ///
    /// Pairs with both key and value empty are ignored.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if key.is_empty() && value.is_empty() {
            return;
        }

        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((key, value)),
        }
    }

    /// Returns the value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over values in argument order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, v)| v.as_str())
    }

    /// Iterates over `(key, value)` pairs in argument order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for SubmissionArgs
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (key, value) in iter {
            args.insert(key, value);
        }
        args
    }
}

/// Build configuration recorded by the most recent upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionSession {
    /// Shell command line that compiles the submission.
    pub compile_command: String,
    /// Shell command line that runs the submission, before arguments.
    pub run_command: String,
    /// Subdirectory of the extraction root in which commands run.
    pub work_dir: String,
    /// Name of the extraction root under the assignments directory.
    pub root_dir: String,
    /// Arguments appended to the run command.
    pub args: SubmissionArgs,
}

/// Read/write access to the shared submission session.
///
/// Every `store` replaces the whole record; there is one session per
/// store and the last writer wins.
pub trait SessionStore {
    /// Replaces the stored session.
    fn store(&self, session: SubmissionSession);

    /// Returns a snapshot of the stored session.
    fn current(&self) -> SubmissionSession;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_keep_insertion_order() {
        let args: SubmissionArgs = [("3", "c"), ("1", "a"), ("2", "b")].into_iter().collect();
        assert_eq!(args.values().collect::<Vec<_>>(), ["c", "a", "b"]);
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_args_replace_in_place() {
        let mut args = SubmissionArgs::new();
        args.insert("1", "a");
        args.insert("2", "b");
        args.insert("1", "z");
        assert_eq!(args.iter().collect::<Vec<_>>(), [("1", "z"), ("2", "b")]);
        assert_eq!(args.get("1"), Some("z"));
    }

    #[test]
    fn test_args_ignore_empty_pair() {
        let mut args = SubmissionArgs::new();
        args.insert("", "");
        assert!(args.is_empty());

        args.insert("", "value");
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_session_serializes() {
        let session = SubmissionSession {
            compile_command: "make".into(),
            run_command: "./main".into(),
            root_dir: "hw1".into(),
            args: [("1", "x")].into_iter().collect(),
            ..SubmissionSession::default()
        };
        let json = serde_json::to_value(&session).unwrap_or_default();
        assert_eq!(json["compile_command"], "make");
        assert_eq!(json["args"][0][1], "x");
    }
}
