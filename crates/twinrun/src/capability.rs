//! Capability identity and runtime sides.

use std::fmt;

/// The interface contract both sides must agree on for a given name.
///
/// Two capabilities are the same type when their names and method lists are
/// equal. The `Display` form, e.g. `EchoService(echo)`, is what travels in
/// every call frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Capability {
    pub name: &'static str,
    pub methods: &'static [&'static str],
}

impl Capability {
    pub const fn new(name: &'static str, methods: &'static [&'static str]) -> Self {
        Self { name, methods }
    }

    pub fn has_method(&self, method: &str) -> bool {
        self.methods.contains(&method)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.methods.join(","))
    }
}

/// Strong type for the runtime a bridge endpoint belongs to.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Side(pub String);

impl Side {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ECHO: Capability = Capability::new("EchoService", &["echo"]);
    const COUNTER: Capability = Capability::new("Counter", &["add", "total"]);

    #[test]
    fn test_display_is_wire_identity() {
        assert_eq!(ECHO.to_string(), "EchoService(echo)");
        assert_eq!(COUNTER.to_string(), "Counter(add,total)");
    }

    #[test]
    fn test_identity_includes_methods() {
        let narrower = Capability::new("Counter", &["add"]);
        assert_ne!(COUNTER, narrower);
        assert!(COUNTER.has_method("total"));
        assert!(!narrower.has_method("total"));
    }
}
