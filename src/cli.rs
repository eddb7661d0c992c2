// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, arg, command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn window_args(cmd: Command) -> Command {
    cmd.arg(arg!(--period <PERIOD> "day | week | month (default month)").required(false))
        .arg(arg!(--date <DATE> "Reference date YYYY-MM-DD (default today)").required(false))
}

pub fn build_cli() -> Command {
    command!()
        .name("aibudget")
        .about("Track income, spending and a mock investment portfolio")
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Create the local database"))
        .subcommand(
            Command::new("user")
                .about("Local accounts")
                .subcommand(
                    Command::new("register")
                        .arg(arg!(--id <ID> "Username, at least 4 characters").required(true))
                        .arg(arg!(--name <NAME> "Display name").required(true))
                        .arg(arg!(--pin <PIN> "6-digit PIN").required(true)),
                )
                .subcommand(
                    Command::new("login")
                        .arg(arg!(--id <ID>).required(true))
                        .arg(arg!(--pin <PIN>).required(true)),
                )
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("whoami")),
        )
        .subcommand(
            Command::new("tx")
                .about("Record, list and delete transactions")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--date <DATE> "YYYY-MM-DD (default today)").required(false))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_name("TYPE")
                                .default_value("expense")
                                .help("income | expense"),
                        )
                        .arg(arg!(--category <CATEGORY> "Category key or label").required(true))
                        .arg(arg!(--item <ITEM> "What it was").required(true))
                        .arg(arg!(--amount <AMOUNT>).required(true))
                        .arg(arg!(--note <SYMBOL> "Ticker for investments").required(false))
                        .arg(arg!(--units <UNITS> "Units bought for investments").required(false))
                        .arg(arg!(--slip <REF> "Receipt image reference").required(false)),
                )
                .subcommand(json_flags(window_args(Command::new("list")).arg(
                    arg!(--all "Ignore the period and list everything").action(ArgAction::SetTrue),
                )))
                .subcommand(
                    Command::new("rm")
                        .arg(
                            arg!(--id <ID>)
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(arg!(--yes "Skip the confirmation prompt").action(ArgAction::SetTrue)),
                ),
        )
        .subcommand(json_flags(window_args(
            Command::new("summary").about("Income, spending and balance for a period"),
        )))
        .subcommand(
            Command::new("portfolio")
                .about("Holdings valued from investment transactions")
                .subcommand(json_flags(Command::new("value")))
                .subcommand(
                    Command::new("price")
                        .subcommand(
                            Command::new("set")
                                .arg(arg!(--symbol <SYMBOL>).required(true))
                                .arg(arg!(--price <PRICE>).required(true)),
                        )
                        .subcommand(Command::new("list")),
                ),
        )
        .subcommand(
            Command::new("chat")
                .about("Ask the assistant about your finances")
                .arg(arg!(--message <TEXT>).required(false))
                .arg(
                    arg!(--live "Use Gemini when GEMINI_API_KEY is set").action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("category").subcommand(Command::new("list")))
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(arg!(--format <FMT> "csv | json").required(true))
                    .arg(arg!(--out <PATH>).required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Find records the portfolio ignores"))
}
