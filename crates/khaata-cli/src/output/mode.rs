use crate::cli::{Commands, CustomerCommand, TxnCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    match command {
        Commands::Customer { command } => match command {
            CustomerCommand::List { json }
            | CustomerCommand::Add { json, .. }
            | CustomerCommand::Show { json, .. }
            | CustomerCommand::Delete { json, .. } => {
                if *json {
                    OutputMode::Json
                } else {
                    OutputMode::Text
                }
            }
        },
        Commands::Txn {
            command: TxnCommand::Add { json, .. },
        } => {
            if *json {
                OutputMode::Json
            } else {
                OutputMode::Text
            }
        }
        // Raw endpoint requests answer in JSON regardless of flags.
        Commands::Api { .. } => OutputMode::Json,
    }
}

#[cfg(test)]
mod tests {
    use super::{OutputMode, mode_for_command};
    use crate::cli::parse_from;

    #[test]
    fn mode_uses_json_for_customer_commands_with_json_flag() {
        let cases: [Vec<&str>; 4] = [
            vec!["khaata", "customer", "list", "--json"],
            vec!["khaata", "customer", "add", "--name", "Asha Traders", "--json"],
            vec!["khaata", "customer", "show", "cus_1", "--json"],
            vec!["khaata", "customer", "delete", "cus_1", "--json"],
        ];

        for case in cases {
            let parsed = parse_from(case.clone());
            assert!(parsed.is_ok(), "failed to parse: {case:?}");
            if let Ok(cli) = parsed {
                assert_eq!(mode_for_command(&cli.command), OutputMode::Json);
            }
        }
    }

    #[test]
    fn mode_uses_json_for_txn_add_with_json_flag() {
        let parsed = parse_from([
            "khaata", "txn", "add", "--customer", "cus_1", "--amount", "10", "--type", "payment",
            "--json",
        ]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert_eq!(mode_for_command(&cli.command), OutputMode::Json);
        }
    }

    #[test]
    fn mode_is_always_json_for_api() {
        let parsed = parse_from(["khaata", "api", "{\"action\": \"listCustomers\"}"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert_eq!(mode_for_command(&cli.command), OutputMode::Json);
        }
    }

    #[test]
    fn mode_uses_text_for_commands_without_json_flag() {
        let list = parse_from(["khaata", "customer", "list"]);
        assert!(list.is_ok());
        if let Ok(cli) = list {
            assert_eq!(mode_for_command(&cli.command), OutputMode::Text);
        }

        let txn = parse_from([
            "khaata", "txn", "add", "--customer", "cus_1", "--amount", "10", "--type", "payment",
        ]);
        assert!(txn.is_ok());
        if let Ok(cli) = txn {
            assert_eq!(mode_for_command(&cli.command), OutputMode::Text);
        }
    }
}
