//! Link-layer header types as registered in the tcpdump.org LINKTYPE list
//!
//! Captures may carry link types this crate has no name for. Those are kept as
//! [LinkType::Unknown] so the file can still be read; frames on such a link are
//! simply never addressable.
macro_rules! link_type {
    (
        $(
            $name:ident = $value:literal
        ),*
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum LinkType {
            $(
                $name,
            )*
            Unknown(u16),
        }

        impl From<u16> for LinkType {
            fn from(value: u16) -> Self {
                match value {
                    $(
                        $value => LinkType::$name,
                    )*
                    other => LinkType::Unknown(other),
                }
            }
        }
        impl LinkType {
            /// The numeric LINKTYPE_ value
            pub fn code(self) -> u16 {
                match self {
                    $(
                        LinkType::$name => $value,
                    )*
                    LinkType::Unknown(code) => code,
                }
            }
        }
    };
}
link_type! {
    Null = 0,
    Ethernet = 1,
    Ieee802_5 = 6,
    Slip = 8,
    Ppp = 9,
    Fddi = 10,
    PppHdlc = 50,
    PppEther = 51,
    AtmRfc1483 = 100,
    Raw = 101,
    CHdlc = 104,
    Ieee802_11 = 105,
    Frelay = 107,
    Loop = 108,
    LinuxSll = 113,
    Pflog = 117,
    Ieee802_11Radiotap = 127,
    Ppi = 192,
    Ipv4 = 228,
    Ipv6 = 229,
    Nflog = 239,
    Netlink = 253,
    LinuxSll2 = 276
}
impl From<u32> for LinkType {
    /// The upper 16 bits of the classic header's link type field carry FCS
    /// information and are ignored
    fn from(value: u32) -> Self {
        LinkType::from((value & 0xFFFF) as u16)
    }
}
