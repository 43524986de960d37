//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in `20260301000002_create_lookup_tables.sql`, and converts to and from
//! the matching `tourney_core::bracket` enum.

use tourney_core::bracket::{Format, MatchState, Side};

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Look up a variant by database ID.
            pub fn from_id(id: StatusId) -> Option<Self> {
                $(
                    if id == $val {
                        return Some($name::$variant);
                    }
                )+
                None
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Bracket format of a tournament.
    TournamentFormat {
        SingleElimination = 1,
        DoubleElimination = 2,
    }
}

define_status_enum! {
    /// Lifecycle of a single match.
    MatchStatus {
        Pending = 1,
        Ready = 2,
        Completed = 3,
        Walkover = 4,
        Void = 5,
    }
}

define_status_enum! {
    /// Part of the bracket a match belongs to.
    BracketSide {
        Winners = 1,
        Losers = 2,
        GrandFinal = 3,
    }
}

impl From<TournamentFormat> for Format {
    fn from(value: TournamentFormat) -> Self {
        match value {
            TournamentFormat::SingleElimination => Format::SingleElimination,
            TournamentFormat::DoubleElimination => Format::DoubleElimination,
        }
    }
}

impl From<Format> for TournamentFormat {
    fn from(value: Format) -> Self {
        match value {
            Format::SingleElimination => TournamentFormat::SingleElimination,
            Format::DoubleElimination => TournamentFormat::DoubleElimination,
        }
    }
}

impl From<MatchStatus> for MatchState {
    fn from(value: MatchStatus) -> Self {
        match value {
            MatchStatus::Pending => MatchState::Pending,
            MatchStatus::Ready => MatchState::Ready,
            MatchStatus::Completed => MatchState::Completed,
            MatchStatus::Walkover => MatchState::Walkover,
            MatchStatus::Void => MatchState::Void,
        }
    }
}

impl From<MatchState> for MatchStatus {
    fn from(value: MatchState) -> Self {
        match value {
            MatchState::Pending => MatchStatus::Pending,
            MatchState::Ready => MatchStatus::Ready,
            MatchState::Completed => MatchStatus::Completed,
            MatchState::Walkover => MatchStatus::Walkover,
            MatchState::Void => MatchStatus::Void,
        }
    }
}

impl From<BracketSide> for Side {
    fn from(value: BracketSide) -> Self {
        match value {
            BracketSide::Winners => Side::Winners,
            BracketSide::Losers => Side::Losers,
            BracketSide::GrandFinal => Side::GrandFinal,
        }
    }
}

impl From<Side> for BracketSide {
    fn from(value: Side) -> Self {
        match value {
            Side::Winners => BracketSide::Winners,
            Side::Losers => BracketSide::Losers,
            Side::GrandFinal => BracketSide::GrandFinal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for status in [
            MatchStatus::Pending,
            MatchStatus::Ready,
            MatchStatus::Completed,
            MatchStatus::Walkover,
            MatchStatus::Void,
        ] {
            assert_eq!(MatchStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(MatchStatus::from_id(0), None);
        assert_eq!(BracketSide::from_id(3), Some(BracketSide::GrandFinal));
        assert_eq!(TournamentFormat::from_id(9), None);
    }

    #[test]
    fn core_conversions_agree() {
        assert_eq!(
            Format::from(TournamentFormat::DoubleElimination),
            Format::DoubleElimination
        );
        assert_eq!(MatchStatus::from(MatchState::Walkover), MatchStatus::Walkover);
        assert_eq!(BracketSide::from(Side::Losers).id(), 2);
    }
}
