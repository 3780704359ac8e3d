// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.
use anyhow::Result;
use log::info;
use sql_probe::setup;

fn main() -> Result<()> {
    let (config, _logger) = setup::init(std::env::args_os())?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let connected = runtime.block_on(config.exec());
    // a timed out ODBC worker must not keep the process alive
    runtime.shutdown_background();
    // the probe result is reported on stdout only, never via the exit code
    info!("Finished, connected: {connected}");
    Ok(())
}
