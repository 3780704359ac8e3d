// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

pub mod args;
pub mod check;
pub mod config;
pub mod constants;
pub mod emit;
pub mod ms_sql;
pub mod setup;
pub mod types;
