// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, builder::PossibleValuesParser, value_parser};

fn type_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .help("income or expense")
        .value_parser(PossibleValuesParser::new(["income", "expense"]))
        .ignore_case(true)
}

fn month_arg() -> Arg {
    Arg::new("month").long("month").help("Restrict to a month (YYYY-MM)")
}

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON")
}

fn named(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).required(true).help(help)
}

pub fn build_cli() -> Command {
    Command::new("daybook")
        .version(clap::crate_version!())
        .about("Track income and expenses per dashboard, one day at a time")
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Create the database if missing"))
        .subcommand(
            Command::new("login")
                .about("Sign in; creates the profile and a 'Main' dashboard on first use")
                .arg(named("email", "Email address")),
        )
        .subcommand(Command::new("logout").about("Sign out"))
        .subcommand(Command::new("whoami").about("Show the signed-in user"))
        .subcommand(
            Command::new("profile")
                .about("Profile details")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("rename").arg(named("username", "New display name")),
                ),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Manage dashboards")
                .subcommand(Command::new("list"))
                .subcommand(Command::new("add").arg(named("name", "Dashboard name")))
                .subcommand(
                    Command::new("rename")
                        .arg(named("from", "Current name"))
                        .arg(named("to", "New name")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a dashboard with all its transactions and categories")
                        .arg(named("name", "Dashboard name")),
                )
                .subcommand(
                    Command::new("use")
                        .about("Select the dashboard other commands work on")
                        .arg(named("name", "Dashboard name")),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories of the selected dashboard")
                .subcommand(Command::new("list").arg(type_arg().required(true)))
                .subcommand(
                    Command::new("add")
                        .arg(type_arg().required(true))
                        .arg(named("name", "Category name")),
                )
                .subcommand(
                    Command::new("rename")
                        .about("Rename a category; existing transactions keep the old label")
                        .arg(type_arg().required(true))
                        .arg(named("from", "Current name"))
                        .arg(named("to", "New name")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(type_arg().required(true))
                        .arg(named("name", "Category name")),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .arg(named("date", "YYYY-MM-DD"))
                        .arg(type_arg().required(true))
                        .arg(named("category", "Category label"))
                        .arg(named("amount", "Positive amount"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(month_arg())
                        .arg(type_arg())
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(json_flag())
                        .arg(
                            Arg::new("jsonl")
                                .long("jsonl")
                                .action(ArgAction::SetTrue)
                                .help("Print one JSON object per line"),
                        ),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("day")
                .about("View or replace every entry of one day")
                .subcommand(
                    Command::new("show")
                        .arg(named("date", "YYYY-MM-DD"))
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("save")
                        .about("Replace the day; entries without a positive amount or a category are dropped")
                        .arg(named("date", "YYYY-MM-DD"))
                        .arg(
                            Arg::new("income")
                                .long("income")
                                .action(ArgAction::Append)
                                .help("AMOUNT:CATEGORY, repeatable"),
                        )
                        .arg(
                            Arg::new("expense")
                                .long("expense")
                                .action(ArgAction::Append)
                                .help("AMOUNT:CATEGORY, repeatable"),
                        ),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import from CSV")
                .subcommand(
                    Command::new("transactions")
                        .about("File name must end in .csv and contain 'income' or 'expense'")
                        .arg(named("path", "CSV file")),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export to CSV")
                .subcommand(
                    Command::new("transactions")
                        .arg(type_arg().required(true))
                        .arg(month_arg())
                        .arg(Arg::new("out").long("out").help("Output file")),
                )
                .subcommand(
                    Command::new("report")
                        .about("Month report with incomes, expenses and totals")
                        .arg(named("month", "YYYY-MM"))
                        .arg(Arg::new("out").long("out").help("Output file")),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Summaries of the selected dashboard")
                .subcommand(Command::new("summary").arg(month_arg()).arg(json_flag()))
                .subcommand(
                    Command::new("by-category")
                        .arg(type_arg().required(true))
                        .arg(month_arg())
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("category")
                        .about("Transactions behind one category, newest first")
                        .arg(type_arg().required(true))
                        .arg(named("name", "Category name"))
                        .arg(month_arg()),
                )
                .subcommand(
                    Command::new("cashflow").arg(
                        Arg::new("months")
                            .long("months")
                            .value_parser(value_parser!(usize)),
                    ),
                )
                .subcommand(Command::new("days").arg(named("month", "YYYY-MM")))
                .subcommand(Command::new("years")),
        )
}
