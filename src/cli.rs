// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, arg, command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(arg!(--json "Print as pretty JSON"))
        .arg(arg!(--jsonl "Print as JSON lines"))
}

fn type_arg(help: &'static str) -> Arg {
    Arg::new("type").long("type").value_name("TYPE").help(help)
}

pub fn build_cli() -> Command {
    command!()
        .name("fintrack")
        .about("Track wallets, transactions, budgets, credit cards and gold against the FinTrack API")
        .arg(
            Arg::new("api_url")
                .long("api-url")
                .value_name("URL")
                .global(true)
                .help("API base URL (overrides the stored setting and FINTRACK_API_URL)"),
        )
        .subcommand(Command::new("init").about("Create the local session store"))
        .subcommand(
            Command::new("config")
                .about("Local settings")
                .subcommand(
                    Command::new("set-url")
                        .about("Store the API base URL")
                        .arg(arg!(<url> "Base URL, e.g. http://localhost:8001")),
                )
                .subcommand(Command::new("show").about("Show the active API URL and login state")),
        )
        .subcommand(
            Command::new("auth")
                .about("Log in and out of the API")
                .subcommand(
                    Command::new("login")
                        .arg(arg!(--user <USER> "Username or email").required(true))
                        .arg(
                            arg!(--password <PASSWORD> "Password (or set FINTRACK_PASSWORD)")
                                .required(false),
                        ),
                )
                .subcommand(
                    Command::new("register")
                        .arg(arg!(--email <EMAIL>).required(true))
                        .arg(arg!(--username <USERNAME>).required(true))
                        .arg(arg!(--password <PASSWORD>).required(true))
                        .arg(
                            Arg::new("full_name")
                                .long("full-name")
                                .value_name("NAME")
                                .required(true),
                        ),
                )
                .subcommand(Command::new("logout").about("Forget the stored token"))
                .subcommand(Command::new("whoami").about("Show the logged-in user")),
        )
        .subcommand(
            Command::new("wallet")
                .about("Accounts: bank, e-wallet, cash, paylater")
                .subcommand(json_flags(
                    Command::new("list").about("List accounts with total balance"),
                ))
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(type_arg("bank|wallet|cash|paylater").required(true))
                        .arg(arg!(--currency <CCY>).required(false))
                        .arg(
                            arg!(--parent <ID> "Create as a pocket under this account")
                                .required(false),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Rename an account or change its type or currency")
                        .arg(arg!(<id> "Account id"))
                        .arg(arg!(--name <NAME>).required(false))
                        .arg(type_arg("bank|wallet|cash|paylater"))
                        .arg(arg!(--currency <CCY>).required(false)),
                )
                .subcommand(Command::new("rm").arg(arg!(<id> "Account id"))),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(
                            arg!(--limit <N> "Fetch at most N transactions")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            arg!(--offset <N> "Skip N transactions")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(arg!(--month <MONTH> "Only this month").value_name("YYYY-MM"))
                        .arg(type_arg("income|expense")),
                ))
                .subcommand(
                    Command::new("add")
                        .arg(
                            arg!(--account <ID> "Account the money moves through")
                                .required_unless_present("card"),
                        )
                        .arg(
                            arg!(--card <ID> "Credit card charged instead of an account")
                                .conflicts_with("account"),
                        )
                        .arg(type_arg("income|expense").required(true))
                        .arg(arg!(--category <CATEGORY>).required(true))
                        .arg(arg!(--amount <AMOUNT>).required(true))
                        .arg(arg!(--date <DATE> "YYYY-MM-DD, defaults to today").required(false))
                        .arg(arg!(--description <TEXT>).required(false)),
                )
                .subcommand(Command::new("rm").arg(arg!(<id> "Transaction id")))
                .subcommand(json_flags(
                    Command::new("summary")
                        .about("Cash income, expense, balance and category breakdown")
                        .arg(arg!(--server "Use the API's summary instead of computing locally")),
                )),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly category budgets")
                .subcommand(json_flags(
                    Command::new("list").arg(
                        arg!(--month <MONTH> "Defaults to the current month").value_name("YYYY-MM"),
                    ),
                ))
                .subcommand(
                    Command::new("set")
                        .arg(arg!(--month <MONTH>).value_name("YYYY-MM").required(true))
                        .arg(arg!(--category <CATEGORY>).required(true))
                        .arg(arg!(--amount <AMOUNT>).required(true)),
                )
                .subcommand(Command::new("rm").arg(arg!(<id> "Budget id")))
                .subcommand(
                    Command::new("copy")
                        .about("Copy every budget of one month into another")
                        .arg(arg!(--from <MONTH>).value_name("YYYY-MM").required(true))
                        .arg(arg!(--to <MONTH>).value_name("YYYY-MM").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("status")
                        .about("Spending against each budget")
                        .arg(
                            arg!(--month <MONTH> "Defaults to the current month")
                                .value_name("YYYY-MM"),
                        ),
                )),
        )
        .subcommand(
            Command::new("card")
                .about("Credit cards")
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(
                            Arg::new("last4")
                                .long("last4")
                                .value_name("DIGITS")
                                .required(true),
                        )
                        .arg(arg!(--limit <AMOUNT>).required(true))
                        .arg(arg!(--balance <AMOUNT>).required(false))
                        .arg(
                            Arg::new("billing_day")
                                .long("billing-day")
                                .value_name("DAY")
                                .required(true),
                        )
                        .arg(Arg::new("due_day").long("due-day").value_name("DAY").required(true)),
                )
                .subcommand(Command::new("rm").arg(arg!(<id> "Credit card id")))
                .subcommand(json_flags(
                    Command::new("status")
                        .about("Utilization and days until payment is due")
                        .arg(arg!(--today <DATE> "Evaluate as of this date (YYYY-MM-DD)")),
                )),
        )
        .subcommand(
            Command::new("gold")
                .about("Gold holdings and prices")
                .subcommand(Command::new("price").about("Current price per gram"))
                .subcommand(json_flags(
                    Command::new("history")
                        .arg(arg!(--limit <N>).value_parser(value_parser!(u32))),
                ))
                .subcommand(
                    Command::new("set-price")
                        .about("Record today's price (admin)")
                        .arg(arg!(<price> "Price per gram")),
                )
                .subcommand(json_flags(
                    Command::new("assets")
                        .about("Holdings valued at the current price")
                        .arg(arg!(--price <PRICE> "Value at this price per gram")),
                ))
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(
                            Arg::new("gold_type")
                                .long("gold-type")
                                .value_name("TYPE")
                                .help("antam|ubs|galeri24|pegadaian|other")
                                .required(true),
                        )
                        .arg(arg!(--weight <GRAMS>).required(true))
                        .arg(arg!(--price <PRICE> "Purchase price per gram").required(true))
                        .arg(arg!(--date <DATE> "Purchase date (YYYY-MM-DD)").required(true))
                        .arg(arg!(--storage <LOCATION>).required(false))
                        .arg(arg!(--notes <TEXT>).required(false)),
                )
                .subcommand(Command::new("rm").arg(arg!(<id> "Gold asset id")))
                .subcommand(json_flags(
                    Command::new("summary")
                        .about("Portfolio totals and profit/loss")
                        .arg(arg!(--price <PRICE> "Value at this price per gram"))
                        .arg(arg!(--server "Use the API's summary instead of computing locally")),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Dashboards")
                .subcommand(json_flags(
                    Command::new("dashboard")
                        .arg(
                            arg!(--months <N> "Months of history to show")
                                .value_parser(value_parser!(usize))
                                .default_value("12"),
                        )
                        .arg(
                            arg!(--top <N> "Expense categories to show")
                                .value_parser(value_parser!(usize))
                                .default_value("5"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("cashflow")
                        .about("Income and expense per month")
                        .arg(
                            arg!(--months <N> "Most recent N months")
                                .value_parser(value_parser!(usize))
                                .default_value("12"),
                        )
                        .arg(arg!(--year <YEAR> "Only this year").value_parser(value_parser!(i32))),
                ))
                .subcommand(json_flags(
                    Command::new("categories")
                        .about("Share of each category")
                        .arg(type_arg("income|expense").default_value("expense"))
                        .arg(arg!(--month <MONTH> "Only this month").value_name("YYYY-MM")),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .arg(arg!(--format <FORMAT> "csv|json").default_value("csv"))
                        .arg(arg!(--out <PATH>).required(true)),
                ),
        )
        .propagate_version(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase log verbosity (-v info, -vv debug)"),
        )
}
