/// Generated command reference pages used across the integration tests.
/// Shaped like the output of a cobra-style `generate-docs` command.

pub const GOAL_MD: &str = "## goal

CLI for interacting with Algorand

### SEE ALSO

* [goal account](goal_account.md)\t - Control and manage Algorand accounts
";

pub const GOAL_ACCOUNT_MD: &str = "## goal account

Control and manage Algorand accounts

### SEE ALSO

* [goal](goal.md)\t - CLI for interacting with Algorand
* [goal account new](goal_account_new.md)\t - Create a new account
";

pub const GOAL_ACCOUNT_NEW_MD: &str = "## goal account new

Create a new account

```
goal account new [account name] [flags]
```

### SEE ALSO

* [goal account](goal_account.md)\t - Control and manage Algorand accounts
";

pub const ONLYCMD_MD: &str = "## onlycmd

A tool without subcommands

* [onlycmd](onlycmd.md)\t - this page
";

pub fn goal_pages() -> Vec<(&'static str, &'static str)> {
    vec![
        ("goal.md", GOAL_MD),
        ("goal_account.md", GOAL_ACCOUNT_MD),
        ("goal_account_new.md", GOAL_ACCOUNT_NEW_MD),
    ]
}
