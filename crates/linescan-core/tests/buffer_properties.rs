// Dweve linescan - Section-based line scanning
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Property-based tests for the buffered line source.

use linescan_core::{BufferConfig, BufferedLines, ScanError};
use proptest::prelude::*;

fn source(lines: &[String], capacity: usize) -> BufferedLines<std::vec::IntoIter<String>> {
    let config = BufferConfig::new(capacity).unwrap();
    BufferedLines::with_config(lines.to_vec(), config)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Property: backing up k lines re-yields exactly the last k lines.
    #[test]
    fn prop_backup_round_trip(
        lines in proptest::collection::vec("[a-z0-9 ]{0,12}", 1..40),
        capacity in 1_usize..16,
        pulls_seed in 0_usize..1000,
        k_seed in 0_usize..1000,
    ) {
        let pulls = pulls_seed % lines.len() + 1;
        let mut buffered = source(&lines, capacity);
        for _ in 0..pulls {
            buffered.next_line();
        }

        let k = k_seed % (pulls.min(capacity) + 1);
        prop_assert!(buffered.backup(k).is_ok());

        for expected in &lines[pulls - k..pulls] {
            let got = buffered.next_line();
            prop_assert_eq!(got.as_ref(), Some(expected));
        }
        prop_assert_eq!(buffered.line_number(), pulls);
    }

    /// Property: out-of-bounds backups fail and never move the cursor.
    #[test]
    fn prop_backup_bounds(
        lines in proptest::collection::vec("[a-z]{1,5}", 1..30),
        capacity in 1_usize..8,
        pulls_seed in 0_usize..1000,
        extra in 1_usize..5,
    ) {
        let pulls = pulls_seed % lines.len() + 1;
        let mut buffered = source(&lines, capacity);
        for _ in 0..pulls {
            buffered.next_line();
        }

        let k = pulls.min(capacity) + extra;
        let is_backup_error = matches!(buffered.backup(k), Err(ScanError::Backup { .. }));
        prop_assert!(is_backup_error);
        prop_assert_eq!(buffered.line_number(), pulls);
        prop_assert_eq!(buffered.next_line(), lines.get(pulls).cloned());
    }

    /// Property: look_back is idempotent and does not disturb pulls.
    #[test]
    fn prop_look_back_idempotent(
        lines in proptest::collection::vec("[a-z]{1,5}", 2..30),
        capacity in 1_usize..8,
        n_seed in 0_usize..1000,
        repeats in 1_usize..5,
    ) {
        let mut buffered = source(&lines, capacity);
        let pulls = lines.len() / 2;
        for _ in 0..pulls {
            buffered.next_line();
        }

        let retained = pulls.min(capacity);
        if retained > 0 {
            let n = n_seed % retained + 1;
            let first = buffered.look_back(n).unwrap().to_string();
            for _ in 0..repeats {
                prop_assert_eq!(buffered.look_back(n).unwrap(), first.as_str());
            }
            prop_assert_eq!(&first, &lines[pulls - n]);
        }
        prop_assert_eq!(buffered.next_line(), lines.get(pulls).cloned());
    }

    /// Property: history never exceeds capacity, whatever mix of operations.
    #[test]
    fn prop_history_bounded(
        lines in proptest::collection::vec("[a-z]{1,3}", 0..50),
        capacity in 1_usize..6,
        ops in proptest::collection::vec(0_u8..4, 0..60),
    ) {
        let mut buffered = source(&lines, capacity);
        for op in ops {
            match op {
                0 => { buffered.next_line(); }
                1 => { let _ = buffered.backup(1); }
                2 => { let _ = buffered.look_ahead(capacity); }
                _ => { buffered.skip_lines(1); }
            }
            prop_assert!(buffered.history_len() <= capacity);
        }
    }

    /// Property: look_ahead never changes the order of pulled lines.
    #[test]
    fn prop_look_ahead_preserves_order(
        lines in proptest::collection::vec("[a-z]{1,5}", 0..30),
        capacity in 1_usize..8,
        n_seed in 0_usize..1000,
    ) {
        let mut buffered = source(&lines, capacity);
        let n = n_seed % capacity + 1;
        let peeked = buffered.look_ahead(n).unwrap().map(String::from);
        prop_assert_eq!(peeked, lines.get(n - 1).cloned());

        let pulled: Vec<String> = buffered.collect();
        prop_assert_eq!(pulled, lines);
    }
}
