use std::path::PathBuf;

xflags::xflags! {
    /// Resolve on-chain social activities into notifications.
    cmd subfeed {
        /// Path to the TOML configuration file.
        optional -c,--config config: PathBuf

        /// Load an entity snapshot (JSON) into the local keyspace.
        cmd import {
            required snapshot: PathBuf
        }

        /// Render a JSON array of activities against the local entity cache.
        cmd render {
            required activities: PathBuf
            /// Address of the viewing account.
            optional --viewer viewer: String
            /// Resolve against this JSON snapshot instead of the keyspace.
            optional --snapshot snapshot: PathBuf
            /// Print HTML fragments instead of JSON lines.
            optional --html
        }

        /// Load one page from the off-chain feed service and render it.
        cmd fetch {
            required address: String
            /// Page through notifications instead of the news feed.
            optional --notifications
            optional --offset offset: u64
            optional --limit limit: u64
            /// Address of the viewing account, defaults to the paged address.
            optional --viewer viewer: String
            optional --html
        }
    }
}
