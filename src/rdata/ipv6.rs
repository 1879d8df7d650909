// RFC 5952-ish compressed IPv6 text form. Implemented as a single
// left-to-right scan for the longest run of zero groups, per the explicit
// redesign note in spec.md 9: elide the longest zero run wherever it falls,
// not just a reference implementation's "first run, unless it's within two
// groups of the end" special case.

use std::net::Ipv6Addr;

pub fn format_ipv6(addr: &Ipv6Addr) -> String {
    let segments = addr.segments();

    let (run_start, run_len) = longest_zero_run(&segments);

    if run_len < 2 {
        return segments
            .iter()
            .map(|s| format!("{:x}", s))
            .collect::<Vec<_>>()
            .join(":");
    }

    let mut head: Vec<String> = segments[..run_start].iter().map(|s| format!("{:x}", s)).collect();
    let mut tail: Vec<String> = segments[run_start + run_len..]
        .iter()
        .map(|s| format!("{:x}", s))
        .collect();

    let mut out = String::new();
    if head.is_empty() {
        out.push(':');
    } else {
        out.push_str(&head.join(":"));
    }
    out.push(':');
    if tail.is_empty() {
        out.push(':');
    } else {
        out.push_str(&tail.join(":"));
    }
    head.clear();
    tail.clear();
    out
}

/// Returns `(start_index, length)` of the longest run of zero segments,
/// preferring the leftmost run on a length tie. `length` is 0 if there is no
/// zero segment at all.
fn longest_zero_run(segments: &[u16; 8]) -> (usize, usize) {
    let mut best_start = 0;
    let mut best_len = 0;
    let mut cur_start = 0;
    let mut cur_len = 0;
    for (i, &seg) in segments.iter().enumerate() {
        if seg == 0 {
            if cur_len == 0 {
                cur_start = i;
            }
            cur_len += 1;
            if cur_len > best_len {
                best_len = cur_len;
                best_start = cur_start;
            }
        } else {
            cur_len = 0;
        }
    }
    (best_start, best_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elides_longest_run() {
        let addr: Ipv6Addr = "1234:5678::1".parse().unwrap();
        assert_eq!(format_ipv6(&addr), "1234:5678::1");
    }

    #[test]
    fn no_elision_for_single_zero_group() {
        let addr: Ipv6Addr = "2001:db8:0:1:2:3:4:5".parse().unwrap();
        assert_eq!(format_ipv6(&addr), "2001:db8:0:1:2:3:4:5");
    }

    #[test]
    fn elides_leading_zero_run() {
        let addr: Ipv6Addr = "::1".parse().unwrap();
        assert_eq!(format_ipv6(&addr), "::1");
    }

    #[test]
    fn elides_trailing_zero_run() {
        let addr: Ipv6Addr = "2606:4700::".parse().unwrap();
        assert_eq!(format_ipv6(&addr), "2606:4700::");
    }

    #[test]
    fn all_zero_is_double_colon() {
        let addr: Ipv6Addr = "::".parse().unwrap();
        assert_eq!(format_ipv6(&addr), "::");
    }

    #[test]
    fn prefers_leftmost_on_tie() {
        // Two runs of length 1 each (at index 1 and index 4); leftmost wins,
        // but a run of length 1 is never elided per RFC5952 so no "::" at all.
        let addr = Ipv6Addr::new(1, 0, 2, 3, 0, 4, 5, 6);
        assert_eq!(format_ipv6(&addr), "1:0:2:3:0:4:5:6");
    }
}
