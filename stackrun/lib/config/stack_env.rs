use std::collections::HashMap;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Read access to named environment variables.
pub trait EnvAccessor {
    /// Returns the value of `name`, or `None` if it is unset or empty.
    fn var(&self, name: &str) -> Option<&str>;

    /// Returns the value of `name` coerced to a boolean.
    ///
    /// `true`, `1`, `yes` and `on` are true regardless of case. Anything else is false.
    fn var_bool(&self, name: &str) -> bool {
        self.var(name).is_some_and(|value| {
            matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            )
        })
    }
}

/// The environment a stack image declares for its containers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackEnv {
    vars: HashMap<String, String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl StackEnv {
    /// Builds the environment from `KEY=VALUE` entries as reported by the runtime.
    ///
    /// Entries without `=` are ignored. Later entries win.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let vars = entries
            .into_iter()
            .filter_map(|entry| {
                entry
                    .as_ref()
                    .split_once('=')
                    .map(|(k, v)| (k.to_string(), v.to_string()))
            })
            .collect();

        Self { vars }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl EnvAccessor for StackEnv {
    fn var(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

impl<K, V> FromIterator<(K, V)> for StackEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
