use std::fmt;

/// SQL command text assembled from ordered fragments.
///
/// Fragments are joined with a single space and handed to the driver
/// verbatim; there is no parsing or validation here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sql {
    text: String,
}

impl Sql {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Join fragments into one command.
    ///
    /// ```rust
    /// use sql_session::Sql;
    ///
    /// let sql = Sql::parts(["SELECT name", "FROM user", "WHERE id = ?"]);
    /// assert_eq!(sql.as_str(), "SELECT name FROM user WHERE id = ?");
    /// ```
    pub fn parts<I>(parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let text = parts
            .into_iter()
            .map(|part| part.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(" ");
        Self { text }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<&str> for Sql {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Sql {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for Sql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
