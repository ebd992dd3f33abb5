// SPDX-FileCopyrightText: 2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! One module per value kind: its character handlers, its bucket, its
//! standard-pattern expansion and its public pattern alias.

pub mod date;
pub mod date_time;
pub mod duration;
pub mod month_day;
pub mod offset;
pub mod offset_date_time;
pub mod period;
pub mod time;
pub mod year_month;
pub mod zoned;
