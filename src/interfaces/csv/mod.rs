pub mod bank_account_reader;
