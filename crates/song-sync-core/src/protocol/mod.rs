mod command;
mod dispatcher;
mod line;

pub use {
    command::{Command, RecorderAction, parse_u32_lenient},
    dispatcher::{
        DispatchOutcome, Dispatcher, Inbound, MAX_WRITE_LEN, QueuedCommand, classify,
    },
    line::{LINE_CAPACITY, LineAccumulator},
};
