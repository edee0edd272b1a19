//! Account - Identity and credential of one farmed account

/// One account as loaded from the session store
///
/// The domain never mutates or persists this; it only carries it so log
/// lines and requests can be attributed to the right account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSession {
    /// Zero-based position in the data file
    pub index: usize,
    /// Telegram user id
    pub user_id: u64,
    pub first_name: String,
    pub last_name: String,
    /// Raw Telegram init-data query, sent as the bearer credential
    pub init_data: String,
    pub proxy: Option<String>,
}

impl AccountSession {
    /// Stable key used for per-session caches
    pub fn session_key(&self) -> String {
        self.user_id.to_string()
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// One-based label used in log lines
    pub fn label(&self) -> String {
        format!("Account {}", self.index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_trims_missing_parts() {
        let session = AccountSession {
            index: 0,
            user_id: 77,
            first_name: "Ann".into(),
            last_name: String::new(),
            init_data: "query_id=1".into(),
            proxy: None,
        };

        assert_eq!(session.display_name(), "Ann");
        assert_eq!(session.label(), "Account 1");
        assert_eq!(session.session_key(), "77");
    }
}
