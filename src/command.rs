/// CONNECT X'01'
/// BIND X'02'
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Command {
    Connect,
    Bind,
    Unknown(u8),
}

impl From<u8> for Command {
    fn from(value: u8) -> Self {
        match value {
            0x01 => Self::Connect,
            0x02 => Self::Bind,
            val => Self::Unknown(val),
        }
    }
}

impl From<Command> for u8 {
    fn from(value: Command) -> u8 {
        match value {
            Command::Connect => 0x01,
            Command::Bind => 0x02,
            Command::Unknown(val) => val,
        }
    }
}
