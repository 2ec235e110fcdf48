pub mod pkt_queue;
