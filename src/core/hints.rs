//! User-facing text for account removal and mail activation.

pub const REMOVE_ACCOUNT: &str = "The account will be removed from the list.";
pub const REMOVE_DEFAULT_ACCOUNT_NOT_SINGLE: &str =
    " One of the remaining accounts will become the default one.";
pub const CONFIRM_REMOVE_ACCOUNT: &str = "Are you sure you want to remove this account?";
pub const CONFIRM_REMOVE_DEFAULT_ACCOUNT: &str =
    " Are you sure you want to remove it and sign out?";
pub const ERROR_REMOVE_ACCOUNT: &str = "Failed to remove the account.";

/// Which optional modules share data with the default account.
pub fn and_other(calendar: bool, contacts: bool) -> &'static str {
    match (calendar, contacts) {
        (true, true) => ", contacts and calendars",
        (true, false) => " and calendars",
        (false, true) => " and contacts",
        (false, false) => "",
    }
}

pub fn remove_default_account(and_other: &str) -> String {
    format!(
        "This is the default account. Removing it will delete all of its mail{and_other} from this workspace."
    )
}

pub fn after_connect_mail(email: &str) -> (String, String) {
    (
        format!("Mail for {email} is now connected. New messages will appear shortly."),
        format!("{email} connected"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_other_variants() {
        assert_eq!(and_other(false, false), "");
        assert!(and_other(true, false).contains("calendars"));
        assert!(and_other(false, true).contains("contacts"));
        let both = and_other(true, true);
        assert!(both.contains("calendars") && both.contains("contacts"));
    }
}
