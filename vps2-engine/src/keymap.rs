//! Key identities and the set-1 scan-code lookup table.
//!
//! The translator masks the release bit off an incoming scan code and uses
//! the remaining 7 bits as an index into [`lookup`]. The table is pure data;
//! entries with no assigned identity are `None` and count as unmapped.

use crate::modifier::{LockKey, Modifier};

/// Symbolic key identity, independent of the wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Esc,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    Key0,
    Minus,
    Equal,
    Backspace,
    Tab,
    Q,
    W,
    E,
    R,
    T,
    Y,
    U,
    I,
    O,
    P,
    LeftBrace,
    RightBrace,
    Enter,
    LeftCtrl,
    A,
    S,
    D,
    F,
    G,
    H,
    J,
    K,
    L,
    Semicolon,
    Apostrophe,
    Grave,
    LeftShift,
    Backslash,
    Z,
    X,
    C,
    V,
    B,
    N,
    M,
    Comma,
    Dot,
    Slash,
    RightShift,
    KpAsterisk,
    LeftAlt,
    Space,
    CapsLock,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    NumLock,
    ScrollLock,
    Kp7,
    Kp8,
    Kp9,
    KpMinus,
    Kp4,
    Kp5,
    Kp6,
    KpPlus,
    Kp1,
    Kp2,
    Kp3,
    Kp0,
    KpDot,
    /// The extra key on 102-key international layouts.
    Key102nd,
    F11,
    F12,
    LeftMeta,
    RightMeta,
    /// Menu key.
    Compose,
    Power,
    Sleep,
    Wakeup,
    Search,
    Bookmarks,
    Up,
    PageUp,
    Left,
    Right,
    End,
    Down,
    PageDown,
    Insert,
    Delete,
    Mute,
    VolumeDown,
    VolumeUp,
    PlayPause,
    StopCd,
    PreviousSong,
    NextSong,
    HomePage,
    Mail,
    Calc,
    Computer,
    KpEnter,
    RightCtrl,
    RightAlt,
    Home,
}

impl KeyCode {
    /// The logical modifier this key contributes to, if any. Left and right
    /// variants coalesce into the same flag.
    pub fn modifier(self) -> Option<Modifier> {
        match self {
            KeyCode::LeftShift | KeyCode::RightShift => Some(Modifier::Shift),
            KeyCode::LeftCtrl | KeyCode::RightCtrl => Some(Modifier::Ctrl),
            KeyCode::LeftAlt | KeyCode::RightAlt => Some(Modifier::Alt),
            _ => None,
        }
    }

    /// The lock state this key toggles, if any.
    pub fn lock(self) -> Option<LockKey> {
        match self {
            KeyCode::CapsLock => Some(LockKey::Caps),
            KeyCode::NumLock => Some(LockKey::Num),
            KeyCode::ScrollLock => Some(LockKey::Scroll),
            _ => None,
        }
    }
}

/// Scan-code set-1 make codes, indexed by the 7-bit base code.
static SCANCODE_TABLE: [Option<KeyCode>; 128] = {
    use KeyCode::*;
    [
        /* 0x00 */ None,
        /* 0x01 */ Some(Esc),
        /* 0x02 */ Some(Key1),
        /* 0x03 */ Some(Key2),
        /* 0x04 */ Some(Key3),
        /* 0x05 */ Some(Key4),
        /* 0x06 */ Some(Key5),
        /* 0x07 */ Some(Key6),
        /* 0x08 */ Some(Key7),
        /* 0x09 */ Some(Key8),
        /* 0x0A */ Some(Key9),
        /* 0x0B */ Some(Key0),
        /* 0x0C */ Some(Minus),
        /* 0x0D */ Some(Equal),
        /* 0x0E */ Some(Backspace),
        /* 0x0F */ Some(Tab),
        /* 0x10 */ Some(Q),
        /* 0x11 */ Some(W),
        /* 0x12 */ Some(E),
        /* 0x13 */ Some(R),
        /* 0x14 */ Some(T),
        /* 0x15 */ Some(Y),
        /* 0x16 */ Some(U),
        /* 0x17 */ Some(I),
        /* 0x18 */ Some(O),
        /* 0x19 */ Some(P),
        /* 0x1A */ Some(LeftBrace),
        /* 0x1B */ Some(RightBrace),
        /* 0x1C */ Some(Enter),
        /* 0x1D */ Some(LeftCtrl),
        /* 0x1E */ Some(A),
        /* 0x1F */ Some(S),
        /* 0x20 */ Some(D),
        /* 0x21 */ Some(F),
        /* 0x22 */ Some(G),
        /* 0x23 */ Some(H),
        /* 0x24 */ Some(J),
        /* 0x25 */ Some(K),
        /* 0x26 */ Some(L),
        /* 0x27 */ Some(Semicolon),
        /* 0x28 */ Some(Apostrophe),
        /* 0x29 */ Some(Grave),
        /* 0x2A */ Some(LeftShift),
        /* 0x2B */ Some(Backslash),
        /* 0x2C */ Some(Z),
        /* 0x2D */ Some(X),
        /* 0x2E */ Some(C),
        /* 0x2F */ Some(V),
        /* 0x30 */ Some(B),
        /* 0x31 */ Some(N),
        /* 0x32 */ Some(M),
        /* 0x33 */ Some(Comma),
        /* 0x34 */ Some(Dot),
        /* 0x35 */ Some(Slash),
        /* 0x36 */ Some(RightShift),
        /* 0x37 */ Some(KpAsterisk),
        /* 0x38 */ Some(LeftAlt),
        /* 0x39 */ Some(Space),
        /* 0x3A */ Some(CapsLock),
        /* 0x3B */ Some(F1),
        /* 0x3C */ Some(F2),
        /* 0x3D */ Some(F3),
        /* 0x3E */ Some(F4),
        /* 0x3F */ Some(F5),
        /* 0x40 */ Some(F6),
        /* 0x41 */ Some(F7),
        /* 0x42 */ Some(F8),
        /* 0x43 */ Some(F9),
        /* 0x44 */ Some(F10),
        /* 0x45 */ Some(NumLock),
        /* 0x46 */ Some(ScrollLock),
        /* 0x47 */ Some(Kp7),
        /* 0x48 */ Some(Kp8),
        /* 0x49 */ Some(Kp9),
        /* 0x4A */ Some(KpMinus),
        /* 0x4B */ Some(Kp4),
        /* 0x4C */ Some(Kp5),
        /* 0x4D */ Some(Kp6),
        /* 0x4E */ Some(KpPlus),
        /* 0x4F */ Some(Kp1),
        /* 0x50 */ Some(Kp2),
        /* 0x51 */ Some(Kp3),
        /* 0x52 */ Some(Kp0),
        /* 0x53 */ Some(KpDot),
        /* 0x54 */ None,
        /* 0x55 */ None,
        /* 0x56 */ Some(Key102nd),
        /* 0x57 */ Some(F11),
        /* 0x58 */ Some(F12),
        /* 0x59 */ None,
        /* 0x5A */ None,
        /* 0x5B */ Some(LeftMeta),
        /* 0x5C */ Some(RightMeta),
        /* 0x5D */ Some(Compose),
        /* 0x5E */ Some(Power),
        /* 0x5F */ Some(Sleep),
        /* 0x60 */ None,
        /* 0x61 */ None,
        /* 0x62 */ None,
        /* 0x63 */ Some(Wakeup),
        /* 0x64 */ None,
        /* 0x65 */ Some(Search),
        /* 0x66 */ Some(Bookmarks),
        /* 0x67 */ Some(Up),
        /* 0x68 */ Some(PageUp),
        /* 0x69 */ Some(Left),
        /* 0x6A */ Some(Right),
        /* 0x6B */ Some(End),
        /* 0x6C */ Some(Down),
        /* 0x6D */ Some(PageDown),
        /* 0x6E */ Some(Insert),
        /* 0x6F */ Some(Delete),
        /* 0x70 */ None,
        /* 0x71 */ Some(Mute),
        /* 0x72 */ Some(VolumeDown),
        /* 0x73 */ Some(VolumeUp),
        /* 0x74 */ Some(PlayPause),
        /* 0x75 */ Some(StopCd),
        /* 0x76 */ Some(PreviousSong),
        /* 0x77 */ Some(NextSong),
        /* 0x78 */ Some(HomePage),
        /* 0x79 */ Some(Mail),
        /* 0x7A */ Some(Calc),
        /* 0x7B */ Some(Computer),
        /* 0x7C */ Some(KpEnter),
        /* 0x7D */ Some(RightCtrl),
        /* 0x7E */ Some(RightAlt),
        /* 0x7F */ Some(Home),
    ]
};

/// Key identity for a 7-bit table index, `None` when unmapped or out of
/// range.
pub fn lookup(index: u8) -> Option<KeyCode> {
    SCANCODE_TABLE.get(index as usize).copied().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_row_maps() {
        assert_eq!(lookup(0x1E), Some(KeyCode::A));
        assert_eq!(lookup(0x2E), Some(KeyCode::C));
        assert_eq!(lookup(0x10), Some(KeyCode::Q));
        assert_eq!(lookup(0x39), Some(KeyCode::Space));
    }

    #[test]
    fn gaps_are_unmapped() {
        for index in [0x00, 0x54, 0x55, 0x59, 0x5A, 0x60, 0x61, 0x62, 0x64, 0x70] {
            assert_eq!(lookup(index), None, "index 0x{index:02X} should be unmapped");
        }
    }

    #[test]
    fn out_of_range_is_unmapped() {
        assert_eq!(lookup(0x80), None);
        assert_eq!(lookup(0xFF), None);
    }

    #[test]
    fn modifier_variants_coalesce() {
        assert_eq!(KeyCode::LeftShift.modifier(), Some(Modifier::Shift));
        assert_eq!(KeyCode::RightShift.modifier(), Some(Modifier::Shift));
        assert_eq!(KeyCode::LeftCtrl.modifier(), Some(Modifier::Ctrl));
        assert_eq!(KeyCode::RightCtrl.modifier(), Some(Modifier::Ctrl));
        assert_eq!(KeyCode::LeftAlt.modifier(), Some(Modifier::Alt));
        assert_eq!(KeyCode::RightAlt.modifier(), Some(Modifier::Alt));
        assert_eq!(KeyCode::A.modifier(), None);
    }

    #[test]
    fn lock_keys_classify() {
        assert_eq!(KeyCode::CapsLock.lock(), Some(LockKey::Caps));
        assert_eq!(KeyCode::NumLock.lock(), Some(LockKey::Num));
        assert_eq!(KeyCode::ScrollLock.lock(), Some(LockKey::Scroll));
        assert_eq!(KeyCode::LeftShift.lock(), None);
    }

    #[test]
    fn full_table_edges() {
        assert_eq!(lookup(0x01), Some(KeyCode::Esc));
        assert_eq!(lookup(0x7F), Some(KeyCode::Home));
        assert_eq!(lookup(0x7C), Some(KeyCode::KpEnter));
    }
}
