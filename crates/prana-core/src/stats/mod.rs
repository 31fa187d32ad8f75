mod badges;
mod ledger;
mod motivation;
mod periods;

pub use badges::{Badge, CHAMPION_TOTAL_REPS, WEEKLY_PRO_SESSIONS};
pub use ledger::{StatsLedger, StatsRecord, POINTS_PER_SESSION};
pub use motivation::{MotivationTier, CONGRATULATIONS};
pub use periods::{week_number, DailyWindow, MonthlyWindow, WeeklyWindow};
