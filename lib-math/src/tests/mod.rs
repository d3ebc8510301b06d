mod angles;
